//! Unit prices, discount rates and row generation for a [`PricingItem`].

use crate::domain::{PriceOption, PricingItem, PricingType, Row, RowId, RowType, Won};

/// Rounding unit used when none is configured.
pub const DEFAULT_ROUND_UNIT: i64 = 1_000;

/// Rounds `value` to the nearest multiple of `unit`. A unit of zero or less
/// means plain rounding to the nearest won.
pub fn round_price(value: f64, unit: i64) -> f64 {
    if unit <= 0 {
        return value.round();
    }
    let unit = unit as f64;
    (value / unit).round() * unit
}

/// Rounds to one decimal place.
pub fn round_rate(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Counted quantity of a tier: sessions, shots, or both multiplied.
pub fn total_quantity(kind: PricingType, sessions: u32, shots: u32) -> u64 {
    match kind {
        PricingType::Session => u64::from(sessions),
        PricingType::Shot => u64::from(shots),
        PricingType::Mixed => u64::from(shots) * u64::from(sessions),
    }
}

/// Price per counted unit, rounded to `round_unit`.
///
/// The rounding unit shrinks by factors of ten while it is larger than a
/// tenth of the raw unit price, so a 1,000 won unit does not erase per-shot
/// prices of a few thousand won. The same applies to session prices: below
/// ten times the configured unit they no longer snap to it, e.g. 4,550 won
/// rounds to 4,600 rather than 5,000 with a 1,000 won unit.
pub fn unit_price(price: Won, total_quantity: u64, round_unit: i64) -> Won {
    if price == 0 || total_quantity == 0 {
        return 0;
    }
    let raw = price as f64 / total_quantity as f64;
    let mut unit = round_unit;
    while unit > 1 && (unit as f64) * 10.0 > raw {
        unit /= 10;
    }
    round_price(raw, unit).max(0.0) as Won
}

/// Percentage by which `option` is cheaper than `base`, one decimal.
/// Negative when `option` is more expensive. `None` when `base` is not
/// positive.
pub fn discount_rate(base: f64, option: f64) -> Option<f64> {
    if base <= 0.0 {
        return None;
    }
    Some(round_rate((1.0 - option / base) * 100.0))
}

/// How much cheaper our unit price is than the competitor's.
pub fn competitor_advantage(competitor_unit: f64, our_unit: f64) -> Option<f64> {
    discount_rate(competitor_unit, our_unit)
}

/// Column header for unit prices of a pricing type.
pub fn unit_label(kind: Option<PricingType>) -> &'static str {
    match kind {
        Some(PricingType::Session) => "회당가",
        Some(PricingType::Shot) | Some(PricingType::Mixed) => "샷당가",
        None => "단가",
    }
}

/// Display form of a tier's quantity: `3회`, `300샷`,
/// `300샷 × 3회 (총 900샷)`.
pub fn quantity_label(kind: PricingType, sessions: u32, shots: u32) -> String {
    match kind {
        PricingType::Session => format!("{}회", sessions),
        PricingType::Shot => format!("{}샷", shots),
        PricingType::Mixed => format!(
            "{}샷 × {}회 (총 {}샷)",
            shots,
            sessions,
            u64::from(shots) * u64::from(sessions)
        ),
    }
}

/// Builds the rows for one procedure in fixed order: trial, event, one per
/// option, then the competitor when enabled. `violation` is always `false`
/// here; see [`super::validator`].
///
/// A row without a unit price of its own (price or quantity of zero) gets
/// `None` discount rates rather than 100%, so "not priced" stays distinct
/// from "free".
pub fn compute_item_rows(item: &PricingItem, round_unit: i64) -> Vec<Row> {
    let kind = item.kind;
    let base_shots = item.effective_base_shots();
    let base_sessions = item.effective_base_sessions();
    let mut builder = RowBuilder::new(kind, round_unit);

    let trial = builder.push(
        RowType::Trial,
        format!("체험가 ({})", quantity_label(kind, base_sessions, base_shots)),
        item.trial_price,
        base_sessions,
        base_shots,
    );
    let event = builder.push(
        RowType::Event,
        format!("이벤트가 ({})", quantity_label(kind, base_sessions, base_shots)),
        item.event_price,
        base_sessions,
        base_shots,
    );
    for option in &item.options {
        let (sessions, shots) = option_shape(kind, option);
        builder.push(
            RowType::Option,
            quantity_label(kind, sessions, shots),
            option.price,
            sessions,
            shots,
        );
    }
    let competitor = if item.competitor.enabled {
        let quote = &item.competitor;
        let sessions = quote.sessions.unwrap_or(1);
        let shots = if kind.uses_shots() {
            quote.shots.unwrap_or(base_shots)
        } else {
            0
        };
        let title = match quote.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("경쟁사 {}", name),
            _ => "경쟁사".to_string(),
        };
        Some(builder.push(
            RowType::Competitor,
            format!("{} ({})", title, quantity_label(kind, sessions, shots)),
            quote.price,
            sessions,
            shots,
        ))
    } else {
        None
    };

    let mut rows = builder.finish();
    let trial_unit = rows[trial.0].unit_price;
    let event_unit = rows[event.0].unit_price;

    for row in rows.iter_mut() {
        match row.row_type {
            RowType::Trial => {
                row.discount_from_event = rate_against(event_unit, row.unit_price);
            }
            RowType::Event => {
                row.discount_from_trial = rate_against(trial_unit, row.unit_price);
            }
            RowType::Option => {
                row.discount_from_trial = rate_against(trial_unit, row.unit_price);
                row.discount_from_event = rate_against(event_unit, row.unit_price);
            }
            RowType::Competitor => {}
        }
    }
    if let Some(RowId(idx)) = competitor {
        let competitor_unit = rows[idx].unit_price;
        rows[idx].competitor_advantage = if event_unit == 0 {
            None
        } else {
            competitor_advantage(competitor_unit as f64, event_unit as f64)
        };
    }

    rows
}

fn option_shape(kind: PricingType, option: &PriceOption) -> (u32, u32) {
    match kind {
        PricingType::Session => (option.sessions.unwrap_or(0), 0),
        PricingType::Shot => (option.sessions.unwrap_or(1), option.shots.unwrap_or(0)),
        PricingType::Mixed => (option.sessions.unwrap_or(1), option.shots.unwrap_or(0)),
    }
}

/// Rate of `unit` against `base`; undefined when the row has no unit price.
fn rate_against(base: Won, unit: Won) -> Option<f64> {
    if unit == 0 {
        return None;
    }
    discount_rate(base as f64, unit as f64)
}

struct RowBuilder {
    kind: PricingType,
    round_unit: i64,
    rows: Vec<Row>,
}

impl RowBuilder {
    fn new(kind: PricingType, round_unit: i64) -> Self {
        Self {
            kind,
            round_unit,
            rows: Vec::new(),
        }
    }

    fn push(
        &mut self,
        row_type: RowType,
        label: String,
        price: Won,
        sessions: u32,
        shots: u32,
    ) -> RowId {
        let id = RowId(self.rows.len());
        let total = total_quantity(self.kind, sessions, shots);
        self.rows.push(Row {
            row_id: id,
            row_type,
            label,
            price,
            sessions,
            shots,
            total_quantity: total,
            unit_price: unit_price(price, total, self.round_unit),
            discount_from_trial: None,
            discount_from_event: None,
            competitor_advantage: None,
            violation: false,
        });
        id
    }

    fn finish(self) -> Vec<Row> {
        self.rows
    }
}
