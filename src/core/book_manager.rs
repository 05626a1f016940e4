use std::path::{Path, PathBuf};

use crate::core::{PriceBook, CURRENT_SCHEMA_VERSION};
use crate::errors::PricingError;
use crate::storage::StorageBackend;

/// Facade that owns the working price book and its persistence target.
pub struct BookManager {
    pub current: PriceBook,
    current_path: Option<PathBuf>,
    dirty: bool,
    storage: Box<dyn StorageBackend>,
}

impl BookManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: PriceBook::new(),
            current_path: None,
            dirty: false,
            storage,
        }
    }

    /// The file `save` would write to right now.
    pub fn save_target(&self) -> PathBuf {
        self.current_path
            .clone()
            .unwrap_or_else(|| self.storage.managed_path())
    }

    /// Replaces the working book with the managed one from storage.
    pub fn load(&mut self) -> Result<(), PricingError> {
        let book = self.storage.load()?;
        self.apply_load(book, None)
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<(), PricingError> {
        let book = self.storage.load_from_path(path)?;
        self.apply_load(book, Some(path.to_path_buf()))
    }

    /// Writes to the path the book was loaded from, or the managed location.
    pub fn save(&mut self) -> Result<PathBuf, PricingError> {
        let mut snapshot = self.current.clone();
        let path = match self.current_path.clone() {
            Some(path) => {
                self.storage.save_to_path(&mut snapshot, &path)?;
                path
            }
            None => self.storage.save(&mut snapshot)?,
        };
        self.current = snapshot;
        self.dirty = false;
        Ok(path)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), PricingError> {
        let mut snapshot = self.current.clone();
        self.storage.save_to_path(&mut snapshot, path)?;
        self.current = snapshot;
        self.current_path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn apply_load(&mut self, book: PriceBook, path: Option<PathBuf>) -> Result<(), PricingError> {
        ensure_schema_support(book.schema_version)?;
        self.current = book;
        self.current_path = path;
        self.dirty = false;
        Ok(())
    }
}

fn ensure_schema_support(version: u8) -> Result<(), PricingError> {
    if version > CURRENT_SCHEMA_VERSION {
        Err(PricingError::UnsupportedSchema {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Procedure;
    use crate::storage::JsonStorage;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn manager(root: &Path) -> BookManager {
        let storage = JsonStorage::new(Some(root.to_path_buf())).unwrap();
        BookManager::new(Box::new(storage))
    }

    #[test]
    fn save_then_load_restores_library() {
        let temp = tempdir().unwrap();
        let mut first = manager(temp.path());
        first
            .current
            .upsert_procedure(Procedure::new(Uuid::from_u128(1), "슈링크", 99_000, 150_000));
        first.mark_dirty();
        let path = first.save().unwrap();
        assert!(path.exists());
        assert!(!first.is_dirty());

        let mut second = manager(temp.path());
        second.load().unwrap();
        assert_eq!(second.current.procedures.len(), 1);
        assert_eq!(second.current.procedures[0].event_price, 150_000);
    }

    #[test]
    fn save_to_path_becomes_the_save_target() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("export.json");
        let mut manager = manager(temp.path());
        assert_eq!(manager.save_target(), temp.path().join("price_book.json"));
        manager.save_to_path(&target).unwrap();
        assert_eq!(manager.save_target(), target);
        assert_eq!(manager.current_path(), Some(target.as_path()));
        assert_eq!(manager.save().unwrap(), target);
    }

    #[test]
    fn unsupported_schema_is_rejected() {
        assert!(ensure_schema_support(CURRENT_SCHEMA_VERSION).is_ok());
        assert!(matches!(
            ensure_schema_support(CURRENT_SCHEMA_VERSION + 1),
            Err(PricingError::UnsupportedSchema { .. })
        ));
    }
}
