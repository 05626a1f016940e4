#![doc(test(attr(deny(warnings))))]

//! Clinic Pricing turns free-form package text into priced bundles and
//! checks tiered procedure prices against the volume discount rule.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod matcher;
pub mod parser;
pub mod pricing;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use currency::{extract_prices, parse_korean_price, ExtractedPrices};
pub use matcher::{find_best_match, match_branch_prices, match_procedure_prices};
pub use parser::{detect_format, parse_bulk_text, TextFormat};
pub use pricing::{
    compute_item_rows, compute_package_summary, validate_all, validate_monotonic, PackageSummary,
    ValidationOutcome,
};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Clinic pricing tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
