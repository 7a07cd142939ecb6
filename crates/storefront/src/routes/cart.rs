//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the browser's session: every handler snapshots
//! the cart key, runs one synchronous `CartStore` operation and flushes the
//! snapshot back before responding. Mutations of one session run one at a
//! time behind [`crate::middleware::serialize_cart_mutations`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use garden_records_core::{Cart, CartCandidate, CartStore, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::services::SessionStorage;
use crate::state::AppState;
use crate::views::{BadgeView, CartView};

// =============================================================================
// Session Helpers
// =============================================================================

/// Open the cart store over this browser's session.
async fn open_store(state: &AppState, session: Session) -> CartStore<SessionStorage> {
    let key = state.config().cart.storage_key.clone();
    let storage = SessionStorage::load(session, &[key.as_str()]).await;
    CartStore::with_key(storage, key)
}

/// Read the current cart without writing anything back.
pub(crate) async fn load_cart(state: &AppState, session: Session) -> Cart {
    open_store(state, session).await.get_cart()
}

/// Write the store's changes back to the session and return the cart.
async fn commit(store: CartStore<SessionStorage>) -> Result<Cart> {
    let cart = store.get_cart();
    store.into_backend().flush().await?;
    Ok(cart)
}

/// Whether the request was issued by HTMX.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

// =============================================================================
// Form Parsing
// =============================================================================

/// Parse a form value the way the browser's `Number()` coerces attributes.
///
/// Blank text is 0, a missing field or anything non-numeric is `fallback`.
fn to_number(raw: Option<&str>, fallback: f64) -> f64 {
    let Some(raw) = raw else {
        return fallback;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(fallback)
}

/// Parse an integer form value; blank or non-integer text is `None`.
fn to_integer(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
}

/// Add to cart form data, mirroring an `.add-to-cart` button's data attributes.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub image: Option<String>,
    pub quantity: Option<String>,
}

impl AddToCartForm {
    /// Build the candidate. A non-numeric id becomes 0 and a non-numeric
    /// price becomes NaN, so both are rejected by validation.
    #[must_use]
    pub fn to_candidate(&self) -> CartCandidate {
        let id = to_integer(self.id.as_deref()).unwrap_or(0);
        let price = to_number(self.price.as_deref(), f64::NAN);

        let mut candidate = CartCandidate::new(id, price);
        candidate.name.clone_from(&self.name);
        candidate.kind.clone_from(&self.kind);
        candidate.image_url.clone_from(&self.image);
        candidate.quantity = to_integer(self.quantity.as_deref());
        candidate
    }
}

/// Update cart form data.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCartForm {
    pub id: Option<String>,
    pub delta: Option<String>,
}

impl UpdateCartForm {
    /// Quantity step: one unit up or down, or 0 when missing.
    #[must_use]
    pub fn delta(&self) -> i64 {
        to_integer(self.delta.as_deref()).map_or(0, i64::signum)
    }
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: Option<String>,
}

fn form_product_id(raw: Option<&str>) -> Option<ProductId> {
    to_integer(raw).and_then(ProductId::parse_positive)
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub badge: BadgeView,
}

/// Cart items fragment template (for HTMX).
///
/// With `oob`, the total, checkout button and badges ride along as
/// out-of-band swaps.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub badge: BadgeView,
    pub oob: bool,
}

/// Cart badges fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_badges.html")]
pub struct CartBadgesTemplate {
    pub badge: BadgeView,
    pub oob: bool,
}

/// Checkout summary template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub badge: BadgeView,
}

/// Respond to a cart mutation: the refreshed modal body for HTMX, otherwise
/// a redirect back to the cart page.
fn mutation_response(state: &AppState, headers: &HeaderMap, cart: &Cart) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }

    let badge = BadgeView::from_cart(cart);
    (
        AppendHeaders([(badge.trigger_header(), badge.hx_trigger())]),
        CartItemsTemplate {
            cart: CartView::from_cart(cart, state.config().cart.currency),
            badge,
            oob: true,
        },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&state, session).await;

    CartShowTemplate {
        cart: CartView::from_cart(&cart, state.config().cart.currency),
        badge: BadgeView::from_cart(&cart),
    }
}

/// Cart modal body (HTMX).
#[instrument(skip(state, session))]
pub async fn items(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&state, session).await;

    CartItemsTemplate {
        cart: CartView::from_cart(&cart, state.config().cart.currency),
        badge: BadgeView::from_cart(&cart),
        oob: true,
    }
}

/// Get cart count badges (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&state, session).await;

    CartBadgesTemplate {
        badge: BadgeView::from_cart(&cart),
        oob: true,
    }
}

/// Add item to cart (HTMX).
///
/// An invalid candidate is dropped silently with `204 No Content`. On
/// success the badges come back out of band, with the pulse and refresh
/// events fired once they are swapped in.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let candidate = form.to_candidate();
    let mut store = open_store(&state, session).await;

    if store.add_to_cart(&candidate).is_err() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product_id", candidate.id.to_string())],
    );
    let cart = commit(store).await?;

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }

    let badge = BadgeView::from_cart(&cart).pulse();
    Ok((
        AppendHeaders([(badge.trigger_header(), badge.hx_trigger())]),
        CartBadgesTemplate { badge, oob: true },
    )
        .into_response())
}

/// Change a line's quantity by `delta` (HTMX).
///
/// Reaching zero removes the line. An unknown id leaves the cart as it was.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut store = open_store(&state, session).await;

    if let Some(id) = form_product_id(form.id.as_deref()) {
        store.change_quantity(id, form.delta());
    }

    let cart = commit(store).await?;
    Ok(mutation_response(&state, &headers, &cart))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut store = open_store(&state, session).await;

    if let Some(id) = form_product_id(form.id.as_deref()) {
        store.remove_from_cart(id);
    }

    let cart = commit(store).await?;
    Ok(mutation_response(&state, &headers, &cart))
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let mut store = open_store(&state, session).await;
    store.clear_cart();

    let cart = commit(store).await?;
    Ok(mutation_response(&state, &headers, &cart))
}

/// Read-only order summary. An empty cart goes back to the cart page.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let cart = load_cart(&state, session).await;

    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutTemplate {
        cart: CartView::from_cart(&cart, state.config().cart.currency),
        badge: BadgeView::from_cart(&cart),
    }
    .into_response()
}
