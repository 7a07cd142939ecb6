//! A single cart entry and its lenient decoding from stored JSON.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ProductId;

/// Name shown for a line whose product name was never provided.
pub const PLACEHOLDER_NAME: &str = "Product";

/// One entry in the cart.
///
/// ## Invariants
///
/// - `quantity >= 1` while the line is part of a cart
/// - `price` is finite and non-negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product this line refers to.
    pub id: ProductId,
    /// Display name. May be empty when read from older stored data.
    #[serde(default)]
    pub name: String,
    /// Product category label (e.g. "Vinyl"), possibly empty.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Number of units.
    pub quantity: u32,
    /// Thumbnail reference, `null` when there is none.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartLine {
    /// The name to show, falling back to [`PLACEHOLDER_NAME`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            PLACEHOLDER_NAME
        } else {
            &self.name
        }
    }

    /// `price * quantity`, saturating at the decimal range.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Decode one element of a stored cart array.
    ///
    /// Numbers may arrive as JSON numbers or numeric strings. Returns the reason
    /// when the element cannot become a valid line.
    pub(crate) fn from_stored(value: &Value) -> Result<Self, &'static str> {
        let Value::Object(fields) = value else {
            return Err("not an object");
        };

        let id = fields
            .get("id")
            .and_then(loose_number)
            .and_then(positive_id)
            .ok_or("id is not a positive integer")?;

        let price = fields
            .get("price")
            .and_then(loose_number)
            .and_then(non_negative_decimal)
            .ok_or("price is missing, negative or not a number")?;

        let quantity = fields
            .get("quantity")
            .and_then(loose_number)
            .map_or(1, clamp_quantity);

        Ok(Self {
            id,
            name: loose_text(fields.get("name")).unwrap_or_default(),
            kind: loose_text(fields.get("type")).unwrap_or_default(),
            price,
            quantity,
            image_url: loose_text(fields.get("image_url")),
        })
    }
}

/// Read a JSON number or a numeric string.
fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Read a non-empty string.
fn loose_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Integral values in `1..=i32::MAX` only.
#[allow(clippy::cast_possible_truncation)] // range is checked by parse_positive
fn positive_id(raw: f64) -> Option<ProductId> {
    if !raw.is_finite() || raw.fract() != 0.0 {
        return None;
    }
    ProductId::parse_positive(raw as i64)
}

/// Finite, non-negative and representable as a decimal.
///
/// Goes through the shortest round-trip text of the float, so `139.99`
/// becomes exactly `139.99` rather than its binary approximation.
pub(crate) fn non_negative_decimal(raw: f64) -> Option<Decimal> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    raw.to_string().parse::<Decimal>().ok()
}

/// Floor to an integer and clamp into `1..=u32::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped first
fn clamp_quantity(raw: f64) -> u32 {
    if !raw.is_finite() {
        return 1;
    }
    raw.floor().clamp(1.0, f64::from(u32::MAX)) as u32
}
