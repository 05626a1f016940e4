//! Domain types describing bundled service packages.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// A bundle of procedures sold together for a single package price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    pub id: Uuid,
    pub name: String,
    pub package_price: Won,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default)]
    pub items: Vec<PackageItem>,
}

impl Package {
    pub fn new(id: Uuid, name: impl Into<String>, package_price: Won) -> Self {
        Self {
            id,
            name: name.into(),
            package_price,
            memo: None,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<PackageItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_memo(mut self, memo: Option<String>) -> Self {
        self.memo = memo.filter(|value| !value.is_empty());
        self
    }
}

impl NamedEntity for Package {
    fn name(&self) -> &str {
        &self.name
    }
}

/// One procedure inside a package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageItem {
    pub procedure_name: String,
    pub quantity: u32,
    pub individual_price: Won,
    pub price_source: PriceSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_category: Option<String>,
}

impl PackageItem {
    /// Creates an unpriced item awaiting a manual price or a library match.
    pub fn manual(procedure_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            procedure_name: procedure_name.into(),
            quantity: quantity.max(1),
            individual_price: 0,
            price_source: PriceSource::Manual,
            procedure_id: None,
            branch_category: None,
        }
    }

    pub fn priced(
        procedure_name: impl Into<String>,
        individual_price: Won,
        price_source: PriceSource,
    ) -> Self {
        Self {
            individual_price,
            price_source,
            ..Self::manual(procedure_name, 1)
        }
    }

    /// Regular-price contribution of this item (`individual_price × quantity`).
    pub fn regular_total(&self) -> Won {
        self.individual_price
            .saturating_mul(u64::from(self.quantity))
    }

    /// Whether a library match must leave this item alone.
    pub fn is_locked(&self) -> bool {
        self.price_source != PriceSource::Manual && self.individual_price > 0
    }
}

/// Where an item's individual price came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    #[default]
    Manual,
    Trial,
    Event,
    Branch,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceSource::Manual => "manual",
            PriceSource::Trial => "trial",
            PriceSource::Event => "event",
            PriceSource::Branch => "branch",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_item_clamps_quantity_to_one() {
        let item = PackageItem::manual("슈링크", 0);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price_source, PriceSource::Manual);
    }

    #[test]
    fn price_source_serializes_lowercase() {
        let json = serde_json::to_string(&PriceSource::Branch).unwrap();
        assert_eq!(json, "\"branch\"");
    }

    #[test]
    fn locked_items_need_a_price_and_a_library_source() {
        let mut item = PackageItem::priced("시술A", 55_000, PriceSource::Trial);
        assert!(item.is_locked());
        item.individual_price = 0;
        assert!(!item.is_locked());
        let manual = PackageItem {
            individual_price: 10_000,
            ..PackageItem::manual("시술B", 1)
        };
        assert!(!manual.is_locked());
    }
}
