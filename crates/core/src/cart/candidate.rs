//! Add-to-cart input and its validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line::{CartLine, PLACEHOLDER_NAME, non_negative_decimal};
use crate::types::ProductId;

/// Reasons an add-to-cart candidate is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    /// The id is zero, negative or too large to be a catalog product id.
    #[error("product id must be a positive integer (got {0})")]
    InvalidId(i64),
    /// The price is NaN or infinite.
    #[error("price must be a finite number")]
    NonFinitePrice,
    /// The price is below zero or outside the decimal range.
    #[error("price must be a non-negative amount")]
    NegativePrice,
}

/// What an add-to-cart trigger carries.
///
/// Mirrors the data attributes of an `.add-to-cart` button: `id` and `price`
/// are required, everything else is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartCandidate {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl CartCandidate {
    /// Create a candidate with only the required fields.
    #[must_use]
    pub const fn new(id: i64, price: f64) -> Self {
        Self {
            id,
            name: None,
            kind: None,
            price,
            image_url: None,
            quantity: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    #[must_use]
    pub const fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Check the candidate and normalize its optional fields.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError`] when the id is not a positive `i32` or the
    /// price is not a finite, non-negative number.
    pub fn validate(&self) -> Result<ValidCandidate, CandidateError> {
        let id = ProductId::parse_positive(self.id).ok_or(CandidateError::InvalidId(self.id))?;

        if !self.price.is_finite() {
            return Err(CandidateError::NonFinitePrice);
        }
        let price = non_negative_decimal(self.price).ok_or(CandidateError::NegativePrice)?;

        let quantity = self.quantity.unwrap_or(1).max(1);

        Ok(ValidCandidate {
            id,
            name: non_empty(self.name.as_deref()),
            kind: non_empty(self.kind.as_deref()),
            price,
            image_url: non_empty(self.image_url.as_deref()),
            quantity: u32::try_from(quantity).unwrap_or(u32::MAX),
        })
    }
}

/// A candidate that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCandidate {
    pub id: ProductId,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    /// Always at least 1.
    pub quantity: u32,
}

impl ValidCandidate {
    /// Build a fresh cart line, filling the placeholder name.
    pub(crate) fn into_line(self) -> CartLine {
        CartLine {
            id: self.id,
            name: self.name.unwrap_or_else(|| PLACEHOLDER_NAME.to_string()),
            kind: self.kind.unwrap_or_default(),
            price: self.price,
            quantity: self.quantity,
            image_url: self.image_url,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_owned)
}
