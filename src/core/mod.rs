pub mod book_manager;
pub mod price_book;
pub mod services;

pub use book_manager::BookManager;
pub use price_book::{PriceBook, CURRENT_SCHEMA_VERSION};
