//! Template-facing projections of the cart.
//!
//! Views are pure functions of the stored cart, so rendering the same cart
//! twice yields the same markup.

pub mod badge;
pub mod cart;

pub use badge::{BadgeView, CART_PULSE_EVENT, CART_UPDATED_EVENT, PULSE_DURATION_MS};
pub use cart::{CartItemView, CartView};
