//! Monotonic discount rule: buying more must never cost the same or more
//! per unit.

use std::collections::HashSet;

use crate::currency::format_won;
use crate::domain::{PricingItem, Row, RowId};

use super::engine::compute_item_rows;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub rows: Vec<Row>,
    pub violations: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks our priced rows in ascending quantity order and flags every row
/// whose unit price does not drop below its smaller neighbour.
///
/// Competitor rows and incomplete rows (no price, unit price or quantity)
/// are exempt. Rows with equal quantities are never compared. The input is
/// left untouched; the returned rows carry fresh `violation` flags.
pub fn validate_monotonic(rows: &[Row], label: Option<&str>) -> ValidationOutcome {
    let mut eligible: Vec<&Row> = rows
        .iter()
        .filter(|row| row.row_type.is_ours() && row.is_complete())
        .collect();
    eligible.sort_by_key(|row| row.total_quantity);

    let mut flagged: HashSet<RowId> = HashSet::new();
    let mut violations = Vec::new();
    for pair in eligible.windows(2) {
        let (smaller, larger) = (pair[0], pair[1]);
        if larger.total_quantity > smaller.total_quantity
            && larger.unit_price >= smaller.unit_price
        {
            flagged.insert(larger.row_id);
            violations.push(violation_message(label, smaller, larger));
        }
    }

    if !violations.is_empty() {
        tracing::debug!(
            procedure = label.unwrap_or("-"),
            count = violations.len(),
            "monotonic discount rule violated"
        );
    }

    let rows = rows
        .iter()
        .map(|row| Row {
            violation: flagged.contains(&row.row_id),
            ..row.clone()
        })
        .collect();

    ValidationOutcome { rows, violations }
}

fn violation_message(label: Option<&str>, smaller: &Row, larger: &Row) -> String {
    let prefix = match label {
        Some(name) if !name.is_empty() => format!("[{}] ", name),
        _ => String::new(),
    };
    format!(
        "{}{} 단가 {}이(가) {} 단가 {}보다 낮지 않습니다",
        prefix,
        larger.label,
        format_won(larger.unit_price),
        smaller.label,
        format_won(smaller.unit_price),
    )
}

/// Runs the rule over every item, collecting messages in item order.
pub fn validate_all(items: &[PricingItem], round_unit: i64) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| {
            let rows = compute_item_rows(item, round_unit);
            validate_monotonic(&rows, Some(&item.name)).violations
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RowType;

    fn option_row(idx: usize, label: &str, quantity: u64, unit: u64) -> Row {
        Row {
            row_id: RowId(idx),
            row_type: RowType::Option,
            label: label.into(),
            price: unit * quantity,
            sessions: quantity as u32,
            shots: 0,
            total_quantity: quantity,
            unit_price: unit,
            discount_from_trial: None,
            discount_from_event: None,
            competitor_advantage: None,
            violation: false,
        }
    }

    #[test]
    fn rising_unit_price_flags_larger_row() {
        let rows = vec![option_row(0, "3회", 3, 50_000), option_row(1, "5회", 5, 55_000)];
        let outcome = validate_monotonic(&rows, Some("리쥬란"));
        assert_eq!(outcome.violations.len(), 1);
        assert!(!outcome.rows[0].violation);
        assert!(outcome.rows[1].violation);
        assert!(outcome.violations[0].starts_with("[리쥬란] 5회"));
        assert!(!rows[1].violation);
    }

    #[test]
    fn equal_unit_price_is_a_violation() {
        let rows = vec![option_row(0, "3회", 3, 50_000), option_row(1, "5회", 5, 50_000)];
        assert_eq!(validate_monotonic(&rows, None).violations.len(), 1);
    }

    #[test]
    fn equal_quantities_are_not_compared() {
        let rows = vec![option_row(0, "3회 A", 3, 50_000), option_row(1, "3회 B", 3, 60_000)];
        assert!(validate_monotonic(&rows, None).is_clean());
    }

    #[test]
    fn competitor_and_incomplete_rows_are_exempt() {
        let mut competitor = option_row(2, "경쟁사", 10, 90_000);
        competitor.row_type = RowType::Competitor;
        let mut empty = option_row(1, "5회", 5, 0);
        empty.price = 0;
        let rows = vec![option_row(0, "3회", 3, 50_000), empty, competitor];
        let outcome = validate_monotonic(&rows, None);
        assert!(outcome.is_clean());
        assert!(outcome.rows.iter().all(|row| !row.violation));
    }

    #[test]
    fn duplicate_labels_flag_only_the_offending_row() {
        let rows = vec![
            option_row(0, "옵션", 3, 50_000),
            option_row(1, "옵션", 5, 45_000),
            option_row(2, "옵션", 10, 47_000),
        ];
        let outcome = validate_monotonic(&rows, None);
        let flags: Vec<bool> = outcome.rows.iter().map(|row| row.violation).collect();
        assert_eq!(flags, [false, false, true]);
    }

    #[test]
    fn stale_flags_are_cleared() {
        let mut row = option_row(0, "3회", 3, 50_000);
        row.violation = true;
        let outcome = validate_monotonic(&[row], None);
        assert!(!outcome.rows[0].violation);
    }
}
