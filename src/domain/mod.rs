pub mod branch;
pub mod common;
pub mod package;
pub mod pricing_item;
pub mod procedure;
pub mod row;

pub use branch::{BranchManifest, BranchProcedure};
pub use common::{NamedEntity, Won};
pub use package::{Package, PackageItem, PriceSource};
pub use pricing_item::{CompetitorQuote, PriceOption, PricingItem, PricingType};
pub use procedure::Procedure;
pub use row::{Row, RowId, RowType};
