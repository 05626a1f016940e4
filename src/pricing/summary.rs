//! Spreads a package's bundle price across its items.

use serde::{Deserialize, Serialize};

use crate::domain::{Package, Won};

use super::engine::round_rate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBreakdown {
    pub procedure_name: String,
    pub quantity: u32,
    pub individual_price: Won,
    pub item_total: Won,
    pub allocated_price: Won,
    pub savings_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub total_regular_price: Won,
    pub package_price: Won,
    pub savings_amount: i64,
    pub savings_percent: f64,
    pub per_item_breakdown: Vec<ItemBreakdown>,
}

/// Allocates the package price to items in proportion to their regular
/// price. Allocations are rounded per item and may drift from the package
/// price by a few won in total.
pub fn compute_package_summary(package: &Package) -> PackageSummary {
    let total_regular_price: Won = package.items.iter().map(|item| item.regular_total()).sum();
    let package_price = package.package_price;
    let savings_amount = total_regular_price as i64 - package_price as i64;
    let savings_percent = if total_regular_price > 0 {
        round_rate(savings_amount as f64 / total_regular_price as f64 * 100.0)
    } else {
        0.0
    };

    let per_item_breakdown = package
        .items
        .iter()
        .map(|item| {
            let item_total = item.regular_total();
            let allocated_price = if total_regular_price > 0 {
                (package_price as f64 * (item_total as f64 / total_regular_price as f64)).round()
                    as Won
            } else {
                0
            };
            let savings_percent = if item_total > 0 {
                round_rate((1.0 - allocated_price as f64 / item_total as f64) * 100.0)
            } else {
                0.0
            };
            ItemBreakdown {
                procedure_name: item.procedure_name.clone(),
                quantity: item.quantity,
                individual_price: item.individual_price,
                item_total,
                allocated_price,
                savings_percent,
            }
        })
        .collect();

    PackageSummary {
        total_regular_price,
        package_price,
        savings_amount,
        savings_percent,
        per_item_breakdown,
    }
}
