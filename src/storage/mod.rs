pub mod json_backend;

use std::path::{Path, PathBuf};

use crate::{core::PriceBook, errors::PricingError};

pub type Result<T> = std::result::Result<T, PricingError>;

/// Abstraction over persistence backends capable of storing a price book.
pub trait StorageBackend: Send + Sync {
    /// Loads the managed book, or an empty book when none was saved yet.
    fn load(&self) -> Result<PriceBook>;
    /// Where [`StorageBackend::save`] writes.
    fn managed_path(&self) -> PathBuf;
    fn save(&self, book: &mut PriceBook) -> Result<PathBuf>;
    fn load_from_path(&self, path: &Path) -> Result<PriceBook>;
    fn save_to_path(&self, book: &mut PriceBook, path: &Path) -> Result<()>;
}

pub use json_backend::JsonStorage;
