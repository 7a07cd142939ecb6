//! Catalog validation.
//!
//! # Usage
//!
//! ```bash
//! gr-cli catalog check
//! gr-cli catalog check --path crates/storefront/content/products.json
//! ```

use std::path::{Path, PathBuf};

use garden_records_storefront::config::{ConfigError, StorefrontConfig};
use garden_records_storefront::services::{Catalog, CatalogError};
use thiserror::Error;

/// Errors that can occur while checking the catalog.
#[derive(Debug, Error)]
pub enum CatalogCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog file not found: {0}")]
    Missing(PathBuf),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Load the catalog and print a summary.
///
/// Unlike the storefront, a missing file is an error here.
///
/// # Errors
///
/// Returns an error if the file is missing or fails to load.
pub fn check(path: Option<PathBuf>) -> Result<(), CatalogCheckError> {
    let path = match path {
        Some(path) => path,
        None => StorefrontConfig::from_env()?.catalog_path,
    };

    let catalog = load(&path)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}: {} products", path.display(), catalog.len());
        for category in catalog.categories() {
            println!("  - {category}");
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Catalog, CatalogCheckError> {
    if !path.exists() {
        return Err(CatalogCheckError::Missing(path.to_path_buf()));
    }
    Ok(Catalog::load(path)?)
}
