use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::{
    core::{PriceBook, CURRENT_SCHEMA_VERSION},
    errors::PricingError,
    utils::paths::{book_file_in, ensure_dir, resolve_base, write_atomic},
};

use super::{Result, StorageBackend};

/// Stores the price book as pretty-printed JSON under the app directory.
#[derive(Clone)]
pub struct JsonStorage {
    book_file: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = resolve_base(root);
        ensure_dir(&root)?;
        Ok(Self {
            book_file: book_file_in(&root),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<PriceBook> {
        if !self.book_file.exists() {
            tracing::info!(path = %self.book_file.display(), "no saved price book, starting empty");
            return Ok(PriceBook::new());
        }
        self.load_from_path(&self.book_file)
    }

    fn managed_path(&self) -> PathBuf {
        self.book_file.clone()
    }

    fn save(&self, book: &mut PriceBook) -> Result<PathBuf> {
        let path = self.book_file.clone();
        self.save_to_path(book, &path)?;
        Ok(path)
    }

    fn load_from_path(&self, path: &Path) -> Result<PriceBook> {
        load_book_from_path(path)
    }

    fn save_to_path(&self, book: &mut PriceBook, path: &Path) -> Result<()> {
        save_book_to_path(book, path)
    }
}

pub fn load_book_from_path(path: &Path) -> Result<PriceBook> {
    if !path.exists() {
        return Err(PricingError::NotFound(format!(
            "price book `{}`",
            path.display()
        )));
    }
    let data = fs::read_to_string(path)?;
    let book: PriceBook = serde_json::from_str(&data)?;
    if book.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(PricingError::UnsupportedSchema {
            found: book.schema_version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    tracing::info!(
        path = %path.display(),
        packages = book.packages.len(),
        procedures = book.procedures.len(),
        "loaded price book"
    );
    Ok(book)
}

/// Stamps the book with the current schema and time, then writes it
/// atomically.
pub fn save_book_to_path(book: &mut PriceBook, path: &Path) -> Result<()> {
    book.schema_version = CURRENT_SCHEMA_VERSION;
    book.saved_at = Some(Utc::now());
    let json = serde_json::to_string_pretty(book)?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), "saved price book");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Package;
    use tempfile::tempdir;
    use uuid::Uuid;

    #[test]
    fn save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
        let mut book = PriceBook::new();
        book.packages
            .push(Package::new(Uuid::from_u128(7), "리프팅 세트", 390_000));
        let path = storage.save(&mut book).unwrap();
        assert!(path.exists());
        assert!(book.saved_at.is_some());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, book);
    }

    #[test]
    fn missing_managed_book_loads_empty() {
        let temp = tempdir().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
        assert!(storage.load().unwrap().packages.is_empty());
    }

    #[test]
    fn rejects_future_schema_versions() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("future.json");
        let mut book = PriceBook::new();
        book.schema_version = CURRENT_SCHEMA_VERSION + 5;
        fs::write(&path, serde_json::to_string(&book).unwrap()).unwrap();

        let err = load_book_from_path(&path).expect_err("future schema should fail");
        assert!(matches!(err, PricingError::UnsupportedSchema { .. }));
    }

    #[test]
    fn missing_explicit_path_is_not_found() {
        let temp = tempdir().unwrap();
        let err = load_book_from_path(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PricingError::NotFound(_)));
    }
}
