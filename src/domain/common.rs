/// Amount in Korean won. Zero means "unspecified".
pub type Won = u64;

/// Provides access to the name used when matching against price libraries.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use serde;
pub use uuid;
