//! A procedure priced in tiers: trial, event, quantity options and a
//! competitor quote.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Shot count assumed for trial/event rows when none is configured.
pub const DEFAULT_BASE_SHOTS: u32 = 100;

/// How quantity is counted for a procedure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PricingType {
    #[default]
    Session,
    Shot,
    Mixed,
}

impl PricingType {
    /// Parses the lowercase wire name; unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "session" => Some(PricingType::Session),
            "shot" => Some(PricingType::Shot),
            "mixed" => Some(PricingType::Mixed),
            _ => None,
        }
    }

    pub fn uses_shots(self) -> bool {
        matches!(self, PricingType::Shot | PricingType::Mixed)
    }
}

impl fmt::Display for PricingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PricingType::Session => "session",
            PricingType::Shot => "shot",
            PricingType::Mixed => "mixed",
        };
        f.write_str(label)
    }
}

/// Extra quantity tier offered for a procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceOption {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
    #[serde(default)]
    pub price: Won,
}

impl PriceOption {
    pub fn sessions(id: Uuid, sessions: u32, price: Won) -> Self {
        Self {
            id,
            sessions: Some(sessions),
            shots: None,
            price,
        }
    }

    pub fn shots(id: Uuid, shots: u32, price: Won) -> Self {
        Self {
            id,
            sessions: None,
            shots: Some(shots),
            price,
        }
    }

    pub fn mixed(id: Uuid, shots: u32, sessions: u32, price: Won) -> Self {
        Self {
            id,
            sessions: Some(sessions),
            shots: Some(shots),
            price,
        }
    }
}

/// A rival clinic's price, shown for comparison only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompetitorQuote {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Won,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: PricingType,
    #[serde(default)]
    pub trial_price: Won,
    #[serde(default)]
    pub event_price: Won,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_shots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_sessions: Option<u32>,
    #[serde(default)]
    pub options: Vec<PriceOption>,
    #[serde(default)]
    pub competitor: CompetitorQuote,
}

impl PricingItem {
    pub fn new(id: Uuid, name: impl Into<String>, kind: PricingType) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            trial_price: 0,
            event_price: 0,
            base_shots: None,
            base_sessions: None,
            options: Vec::new(),
            competitor: CompetitorQuote::default(),
        }
    }

    pub fn with_prices(mut self, trial_price: Won, event_price: Won) -> Self {
        self.trial_price = trial_price;
        self.event_price = event_price;
        self
    }

    pub fn with_base_shots(mut self, base_shots: u32) -> Self {
        self.base_shots = Some(base_shots);
        self
    }

    pub fn with_base_sessions(mut self, base_sessions: u32) -> Self {
        self.base_sessions = Some(base_sessions);
        self
    }

    pub fn with_option(mut self, option: PriceOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_competitor(mut self, competitor: CompetitorQuote) -> Self {
        self.competitor = competitor;
        self
    }

    /// Shots used by the trial and event rows. Session pricing ignores shots.
    pub fn effective_base_shots(&self) -> u32 {
        if !self.kind.uses_shots() {
            return 0;
        }
        match self.base_shots {
            Some(shots) if shots > 0 => shots,
            _ => DEFAULT_BASE_SHOTS,
        }
    }

    /// Sessions covered by the trial and event prices. Shot pricing counts
    /// shots only, so it always uses a single session.
    pub fn effective_base_sessions(&self) -> u32 {
        if self.kind == PricingType::Shot {
            return 1;
        }
        match self.base_sessions {
            Some(sessions) if sessions > 0 => sessions,
            _ => 1,
        }
    }
}

impl NamedEntity for PricingItem {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_shots_fall_back_to_default_for_shot_types() {
        let item = PricingItem::new(Uuid::nil(), "울쎄라", PricingType::Shot);
        assert_eq!(item.effective_base_shots(), DEFAULT_BASE_SHOTS);
        let item = item.with_base_shots(300);
        assert_eq!(item.effective_base_shots(), 300);
        let session = PricingItem::new(Uuid::nil(), "리쥬란", PricingType::Session)
            .with_base_shots(300);
        assert_eq!(session.effective_base_shots(), 0);
    }

    #[test]
    fn pricing_type_reads_wire_names() {
        assert_eq!(PricingType::parse("Mixed"), Some(PricingType::Mixed));
        assert_eq!(PricingType::parse("bundle"), None);
        let item: PricingItem = serde_json::from_str(
            r#"{"id":"00000000-0000-0000-0000-000000000001","name":"슈링크","type":"shot"}"#,
        )
        .unwrap();
        assert_eq!(item.kind, PricingType::Shot);
        assert!(!item.competitor.enabled);
    }
}
