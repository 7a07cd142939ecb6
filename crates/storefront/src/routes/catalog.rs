//! Home, catalog listing and product detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use garden_records_core::ProductId;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::cart::load_cart;
use crate::services::{CatalogPage, CatalogQuery, Product};
use crate::state::AppState;
use crate::views::BadgeView;

/// Products featured on the home page.
const FEATURED_LIMIT: usize = 6;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<Product>,
    pub currency: &'static str,
    pub badge: BadgeView,
}

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub page: CatalogPage,
    pub query: CatalogQuery,
    pub categories: Vec<String>,
    pub currency: &'static str,
    pub badge: BadgeView,
}

impl CatalogIndexTemplate {
    fn q(&self) -> &str {
        self.query.q.as_deref().unwrap_or_default()
    }

    fn category(&self) -> &str {
        self.query.category.as_deref().unwrap_or_default()
    }

    fn artist(&self) -> &str {
        self.query.artist.as_deref().unwrap_or_default()
    }

    fn min_price(&self) -> &str {
        self.query.min_price.as_deref().unwrap_or_default()
    }

    fn max_price(&self) -> &str {
        self.query.max_price.as_deref().unwrap_or_default()
    }

    fn sort(&self) -> &str {
        self.query.sort.as_deref().unwrap_or_default()
    }

    fn is_category(&self, category: &str) -> bool {
        self.category() == category
    }
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub currency: &'static str,
    pub badge: BadgeView,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&state, session).await;

    HomeTemplate {
        products: state.catalog().featured(FEATURED_LIMIT),
        currency: state.config().cart.currency.code(),
        badge: BadgeView::from_cart(&cart),
    }
}

/// Display the filtered catalog listing.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let cart = load_cart(&state, session).await;
    let page = state.catalog().search(&query);

    CatalogIndexTemplate {
        page,
        query,
        categories: state.catalog().categories(),
        currency: state.config().cart.currency.code(),
        badge: BadgeView::from_cart(&cart),
    }
}

/// Display a product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse> {
    let product = raw_id
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(ProductId::parse_positive)
        .and_then(|id| state.catalog().get(id))
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {raw_id}")))?;

    let cart = load_cart(&state, session).await;

    Ok(ProductShowTemplate {
        product,
        currency: state.config().cart.currency.code(),
        badge: BadgeView::from_cart(&cart),
    })
}
