//! Integration tests for Garden Records.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p garden-records-integration-tests
//! ```
//!
//! Each test spawns the real storefront router on an ephemeral port, backed
//! by an in-memory session store, and drives it over HTTP with a
//! cookie-keeping client, the way a browser would.

use std::net::SocketAddr;
use std::path::PathBuf;

use garden_records_storefront::config::{CartConfig, StorefrontConfig};
use garden_records_storefront::services::{Catalog, CatalogError};
use garden_records_storefront::state::AppState;
use reqwest::{Client, redirect};
use thiserror::Error;
use tokio::task::JoinHandle;
use tower_sessions::MemoryStore;

/// Catalog bundled with the storefront.
pub const BUNDLED_CATALOG: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../storefront/content/products.json"
);

/// Errors starting a test server.
#[derive(Debug, Error)]
pub enum TestServerError {
    #[error("failed to bind test server: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// A storefront running in the background for the duration of a test.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start the storefront with the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or no port is free.
    pub async fn spawn() -> Result<Self, TestServerError> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = test_config(addr);
        let catalog = Catalog::load(&config.catalog_path)?;
        let app = garden_records_storefront::app(
            AppState::new(config, catalog),
            MemoryStore::default(),
        );

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "test server stopped");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A browser-like client: keeps cookies and does not follow redirects, so
/// tests can assert on them.
///
/// # Errors
///
/// Returns an error if the client cannot be built.
pub fn browser() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
}

fn test_config(addr: SocketAddr) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: format!("http://{addr}"),
        database_url: "sqlite::memory:".to_string(),
        catalog_path: PathBuf::from(BUNDLED_CATALOG),
        cart: CartConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
