//! Cart domain: lines, the ordered cart collection and its persistent store.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, unique by product id, in
//! insertion order. All mutation rules live here as pure functions so they can
//! be tested without a browser or a server; [`CartStore`] wraps them in a
//! read-modify-write cycle against a [`KeyValueStore`](crate::KeyValueStore).

mod candidate;
mod line;
mod store;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use candidate::{CandidateError, CartCandidate, ValidCandidate};
pub use line::{CartLine, PLACEHOLDER_NAME};
pub use store::{CartStore, DEFAULT_CART_KEY};

use crate::types::ProductId;

/// Result of a successful [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Added,
    /// An existing line absorbed the candidate.
    Merged {
        /// Quantity of the line after merging.
        quantity: u32,
    },
}

/// Result of [`Cart::change_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line is still present with a new quantity.
    Updated { quantity: u32 },
    /// The quantity reached zero and the line was removed.
    Removed,
    /// No line has that id; nothing changed.
    NotFound,
}

/// The ordered collection of cart lines.
///
/// ## Invariants
///
/// - No two lines share an id
/// - Every line has `quantity >= 1`
/// - Display order is insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Decode a stored cart, never failing.
    ///
    /// Invalid JSON or a non-array value yields an empty cart. Array elements
    /// that cannot form a valid line are skipped, and repeated ids are folded
    /// into the first occurrence.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let items = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                tracing::warn!(kind = json_kind(&other), "stored cart is not a list, using empty cart");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored cart is not valid JSON, using empty cart");
                return Self::default();
            }
        };

        let mut cart = Self::default();
        for (index, item) in items.iter().enumerate() {
            match CartLine::from_stored(item) {
                Ok(line) => cart.absorb(line),
                Err(reason) => tracing::warn!(index, reason, "skipping stored cart line"),
            }
        }
        cart
    }

    /// Serialize the full collection as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |total, line| total.saturating_add(line.line_total()))
    }

    /// Add a candidate, merging into an existing line with the same id.
    ///
    /// Merging increments the quantity and fills `name`, `type` and
    /// `image_url` only where the existing line lacks them. An existing price
    /// is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError`] when the candidate is invalid; the cart is
    /// left untouched.
    pub fn add(&mut self, candidate: &CartCandidate) -> Result<AddOutcome, CandidateError> {
        let valid = candidate.validate()?;

        let Some(existing) = self.line_mut(valid.id) else {
            self.lines.push(valid.into_line());
            return Ok(AddOutcome::Added);
        };

        existing.quantity = existing.quantity.saturating_add(valid.quantity);
        if existing.name.is_empty()
            && let Some(name) = valid.name
        {
            existing.name = name;
        }
        if existing.kind.is_empty()
            && let Some(kind) = valid.kind
        {
            existing.kind = kind;
        }
        if existing.image_url.is_none() {
            existing.image_url = valid.image_url;
        }

        Ok(AddOutcome::Merged {
            quantity: existing.quantity,
        })
    }

    /// Apply `delta` to a line's quantity, removing the line at zero.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) -> QuantityChange {
        let Some(index) = self.lines.iter().position(|line| line.id == id) else {
            return QuantityChange::NotFound;
        };

        let Some(line) = self.lines.get_mut(index) else {
            return QuantityChange::NotFound;
        };
        let next = i64::from(line.quantity).saturating_add(delta).max(0);

        if next == 0 {
            self.lines.remove(index);
            return QuantityChange::Removed;
        }

        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        QuantityChange::Updated {
            quantity: line.quantity,
        }
    }

    /// Remove the line with `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Empty the collection.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    fn absorb(&mut self, line: CartLine) {
        match self.line_mut(line.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
