use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::package::PriceSource;

/// User-curated library entry used to auto-fill package item prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Procedure {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub trial_price: Won,
    #[serde(default)]
    pub event_price: Won,
}

impl Procedure {
    pub fn new(id: Uuid, name: impl Into<String>, trial_price: Won, event_price: Won) -> Self {
        Self {
            id,
            name: name.into(),
            trial_price,
            event_price,
        }
    }

    /// Price used for a package item, preferring the trial price.
    pub fn preferred_price(&self) -> Option<(Won, PriceSource)> {
        if self.trial_price > 0 {
            Some((self.trial_price, PriceSource::Trial))
        } else if self.event_price > 0 {
            Some((self.event_price, PriceSource::Event))
        } else {
            None
        }
    }
}

impl NamedEntity for Procedure {
    fn name(&self) -> &str {
        &self.name
    }
}

