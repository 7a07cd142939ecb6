//! Storefront services.
//!
//! - `catalog` - Product catalog loading and search
//! - `session_storage` - Per-browser key-value storage backed by the session

pub mod catalog;
pub mod session_storage;

pub use catalog::{Catalog, CatalogError, CatalogPage, CatalogQuery, Product};
pub use session_storage::{SessionStorage, StorageError};
