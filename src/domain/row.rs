use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::common::Won;

/// Position token assigned when a row is built. Identifies the row for the
/// validator independently of its display label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub usize);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    Trial,
    Event,
    Option,
    Competitor,
}

impl RowType {
    /// Competitor rows are shown for comparison and exempt from the
    /// monotonic discount rule.
    pub fn is_ours(self) -> bool {
        !matches!(self, RowType::Competitor)
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RowType::Trial => "trial",
            RowType::Event => "event",
            RowType::Option => "option",
            RowType::Competitor => "competitor",
        };
        f.write_str(label)
    }
}

/// One priced tier of a procedure. Derived data, rebuilt on every recompute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub row_id: RowId,
    pub row_type: RowType,
    pub label: String,
    pub price: Won,
    pub sessions: u32,
    pub shots: u32,
    pub total_quantity: u64,
    pub unit_price: Won,
    pub discount_from_trial: Option<f64>,
    pub discount_from_event: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_advantage: Option<f64>,
    #[serde(default)]
    pub violation: bool,
}

impl Row {
    /// Rows with a missing price or quantity are exempt from validation.
    pub fn is_complete(&self) -> bool {
        self.price > 0 && self.unit_price > 0 && self.total_quantity > 0
    }
}
