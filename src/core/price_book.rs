//! The persisted aggregate: packages, the procedure library, priced
//! procedures and branch price sheets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BranchManifest, Package, PricingItem, Procedure};
use crate::matcher::find_best_match;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    CURRENT_SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBook {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
    #[serde(default)]
    pub pricing_items: Vec<PricingItem>,
    #[serde(default)]
    pub branches: BranchManifest,
}

impl Default for PriceBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceBook {
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: None,
            packages: Vec::new(),
            procedures: Vec::new(),
            pricing_items: Vec::new(),
            branches: BranchManifest::new(),
        }
    }

    pub fn remove_package(&mut self, id: Uuid) -> Option<Package> {
        let idx = self.packages.iter().position(|package| package.id == id)?;
        Some(self.packages.remove(idx))
    }

    /// Adds a library entry, replacing the prices of an entry with the same
    /// name.
    pub fn upsert_procedure(&mut self, procedure: Procedure) {
        match self
            .procedures
            .iter_mut()
            .find(|existing| existing.name == procedure.name)
        {
            Some(existing) => {
                existing.trial_price = procedure.trial_price;
                existing.event_price = procedure.event_price;
            }
            None => self.procedures.push(procedure),
        }
    }

    /// Adds a priced procedure, replacing one with the same name.
    pub fn upsert_pricing_item(&mut self, item: PricingItem) {
        match self
            .pricing_items
            .iter_mut()
            .find(|existing| existing.name == item.name)
        {
            Some(existing) => *existing = item,
            None => self.pricing_items.push(item),
        }
    }

    /// Looks up a priced procedure with the same tiers the matcher uses.
    pub fn find_pricing_item(&self, name: &str) -> Option<&PricingItem> {
        find_best_match(name, &self.pricing_items).map(|found| found.candidate)
    }
}
