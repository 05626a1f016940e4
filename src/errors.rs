use thiserror::Error;

/// Failures of the I/O layer around the pricing core (configuration and
/// persistence). Parsing and pricing never fail.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unsupported schema version {found} (latest supported: {supported})")]
    UnsupportedSchema { found: u8, supported: u8 },
}
