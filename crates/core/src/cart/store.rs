//! Read-modify-write cart persistence over a [`KeyValueStore`].

use super::{AddOutcome, CandidateError, Cart, CartCandidate, QuantityChange};
use crate::storage::KeyValueStore;
use crate::types::ProductId;

/// Storage key the cart lives under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart";

/// The single owner of cart persistence for one browser's storage.
///
/// Holds no cart of its own: every operation reads the full collection from
/// the backend, mutates it and writes the full collection back before
/// returning, so the stored value is the only source of truth.
#[derive(Debug)]
pub struct CartStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store using [`DEFAULT_CART_KEY`].
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_CART_KEY)
    }

    /// Create a store persisting under a custom key.
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the cart, yielding an empty one when nothing usable is stored.
    #[must_use]
    pub fn get_cart(&self) -> Cart {
        self.backend
            .get_item(&self.key)
            .map_or_else(Cart::default, |raw| Cart::parse(&raw))
    }

    /// Overwrite the stored cart with `cart`.
    pub fn set_cart(&mut self, cart: &Cart) {
        match cart.to_json() {
            Ok(json) => self.backend.set_item(&self.key, json),
            Err(e) => tracing::error!(error = %e, key = %self.key, "failed to serialize cart"),
        }
    }

    /// Add a candidate and persist the result.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError`] for an invalid candidate. Nothing is written
    /// in that case.
    pub fn add_to_cart(&mut self, candidate: &CartCandidate) -> Result<AddOutcome, CandidateError> {
        let mut cart = self.get_cart();
        let outcome = cart.add(candidate).inspect_err(|e| {
            tracing::debug!(error = %e, id = candidate.id, "add to cart rejected");
        })?;
        self.set_cart(&cart);
        tracing::debug!(id = candidate.id, ?outcome, "added to cart");
        Ok(outcome)
    }

    /// Apply `delta` to a line's quantity and persist the result.
    ///
    /// Nothing is written when no line has `id`.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) -> QuantityChange {
        let mut cart = self.get_cart();
        let change = cart.change_quantity(id, delta);
        if change != QuantityChange::NotFound {
            self.set_cart(&cart);
        }
        tracing::debug!(%id, delta, ?change, "changed cart quantity");
        change
    }

    /// Remove the line with `id` and persist the result.
    ///
    /// Returns whether a line was removed; nothing is written otherwise.
    pub fn remove_from_cart(&mut self, id: ProductId) -> bool {
        let mut cart = self.get_cart();
        let removed = cart.remove(id);
        if removed {
            self.set_cart(&cart);
        }
        tracing::debug!(%id, removed, "removed from cart");
        removed
    }

    /// Store an empty cart.
    pub fn clear_cart(&mut self) {
        self.set_cart(&Cart::default());
    }

    /// Borrow the backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Give the backend back, e.g. to flush it.
    pub fn into_backend(self) -> S {
        self.backend
    }
}
