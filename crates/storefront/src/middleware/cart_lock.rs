//! Per-session serialization of cart mutations.
//!
//! A cart mutation reads the whole cart from the session, writes the whole
//! cart back, and the session layer persists the record after the handler
//! returns. Two posts from the same browser must not interleave anywhere in
//! that window, so this layer sits outside the session layer and holds the
//! session's lock until the record is saved.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header::COOKIE},
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::Mutex;
use tower_sessions::cookie::Cookie;

use super::SESSION_COOKIE_NAME;

/// Locks are dropped after this long without a mutation.
const LOCK_IDLE_SECONDS: u64 = 10 * 60;

/// One async mutex per session id.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        let locks = Cache::builder()
            .max_capacity(100_000)
            .time_to_idle(Duration::from_secs(LOCK_IDLE_SECONDS))
            .build();
        Self { locks }
    }

    /// The lock for `session_id`, created on first use.
    pub async fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .get_with(session_id.to_owned(), async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Session id carried by the request's cookies, if any.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}

/// Run mutating requests of one session one at a time.
///
/// Requests without a session cookie start a fresh session and have nothing
/// to race with.
pub async fn serialize_cart_mutations(
    State(locks): State<SessionLocks>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }
    let Some(session_id) = session_cookie(request.headers()) else {
        return next.run(request).await;
    };

    let lock = locks.lock_for(&session_id).await;
    let _guard = lock.lock().await;
    next.run(request).await
}
