//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame and sniffing protection)
//! 5. Cart lock (one mutating request per session at a time)
//! 6. Session layer (tower-sessions, the per-browser cart storage)

pub mod cart_lock;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use cart_lock::{SessionLocks, serialize_cart_mutations};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
