//! Pricing math over parsed data: per-tier rows, the monotonic discount
//! rule and package savings.

pub mod engine;
pub mod summary;
pub mod validator;

pub use engine::{
    competitor_advantage, compute_item_rows, discount_rate, round_price, unit_label, unit_price,
    DEFAULT_ROUND_UNIT,
};
pub use summary::{compute_package_summary, ItemBreakdown, PackageSummary};
pub use validator::{validate_all, validate_monotonic, ValidationOutcome};
