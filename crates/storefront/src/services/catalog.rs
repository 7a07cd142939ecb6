//! Read-only product catalog loaded from a JSON file at startup.
//!
//! The catalog feeds the listing and detail pages, whose add-to-cart buttons
//! carry each product's id, name, price, category and image.

use std::cmp::Reverse;
use std::path::Path;
use std::sync::Arc;

use garden_records_core::{ProductId, format_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Products shown per catalog page.
pub const PAGE_SIZE: usize = 12;

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// A catalog entry (an album or a piece of merch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub artist: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: u32,
    /// Format label, e.g. "Vinyl", "CD" or "Merch".
    pub category: String,
}

impl Product {
    /// Unit price with two decimals, e.g. "139.99".
    #[must_use]
    pub fn formatted_price(&self) -> String {
        format_amount(self.price)
    }

    fn matches_term(&self, term: &str) -> bool {
        contains_ignore_case(&self.title, term)
            || contains_ignore_case(&self.artist, term)
            || self
                .description
                .as_deref()
                .is_some_and(|d| contains_ignore_case(d, term))
    }
}

/// Catalog listing filters, as sent by the listing page's query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub artist: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl CatalogQuery {
    /// Requested page, 1-based. Anything unparsable or below 1 is page 1.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl CatalogPage {
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// All products, shared across handlers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// Load the catalog from a JSON array of products.
    ///
    /// A missing file yields an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed, or if
    /// it contains duplicate ids or negative prices.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            tracing::warn!("Catalog file does not exist: {:?}", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        let catalog = Self::from_products(products)?;
        tracing::info!(products = catalog.len(), "Loaded catalog from {:?}", path);
        Ok(catalog)
    }

    /// Build a catalog from products already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on duplicate ids or negative prices.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                return Err(CatalogError::NegativePrice(product.id));
            }
        }

        Ok(Self {
            products: Arc::new(products),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The first `limit` products in catalog order, for the home page.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<Product> {
        self.products.iter().take(limit).cloned().collect()
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Filter, sort and paginate the catalog.
    ///
    /// - Every whitespace-separated term of `q` must appear in the title,
    ///   artist or description (case-insensitive)
    /// - `category` must match exactly; `artist` is a substring match
    /// - Price bounds apply only when they are plain digit strings
    /// - `sort` is `price_asc`, `price_desc` or `name_asc`; otherwise newest
    ///   (highest id) first
    #[must_use]
    pub fn search(&self, query: &CatalogQuery) -> CatalogPage {
        let terms: Vec<&str> = query
            .q
            .as_deref()
            .map(|q| q.split_whitespace().collect())
            .unwrap_or_default();
        let category = query.category.as_deref().filter(|c| !c.is_empty());
        let artist = query.artist.as_deref().filter(|a| !a.is_empty());
        let min_price = digits_bound(query.min_price.as_deref());
        let max_price = digits_bound(query.max_price.as_deref());

        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| terms.iter().all(|term| p.matches_term(term)))
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| artist.is_none_or(|a| contains_ignore_case(&p.artist, a)))
            .filter(|p| min_price.is_none_or(|min| p.price >= min))
            .filter(|p| max_price.is_none_or(|max| p.price <= max))
            .collect();

        match query.sort.as_deref() {
            Some("price_asc") => matches.sort_by_key(|p| p.price),
            Some("price_desc") => matches.sort_by_key(|p| Reverse(p.price)),
            Some("name_asc") => matches.sort_by_key(|p| p.title.to_lowercase()),
            _ => matches.sort_by_key(|p| Reverse(p.id)),
        }

        let total_items = matches.len();
        let total_pages = total_items.div_ceil(PAGE_SIZE).max(1);
        let page = query.page();

        let products = matches
            .into_iter()
            .skip((page - 1).saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .cloned()
            .collect();

        CatalogPage {
            products,
            page,
            total_pages,
            total_items,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A price bound given as a non-empty string of ASCII digits.
fn digits_bound(raw: Option<&str>) -> Option<Decimal> {
    raw.filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<Decimal>().ok())
}
