//! Cart count badges and the HTMX events that refresh them.

use garden_records_core::Cart;
use serde_json::json;

/// Length of the badge pulse animation.
pub const PULSE_DURATION_MS: u64 = 650;

/// Event fired after every cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Event fired after a successful add.
pub const CART_PULSE_EVENT: &str = "cart-pulse";

/// Desktop and mobile badge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeView {
    /// Sum of all line quantities.
    pub count: u32,
    /// The mobile badge is hidden, not zeroed, when the cart is empty.
    pub mobile_hidden: bool,
    /// Set after a successful add. The pulse itself is played by the page
    /// once the new badges are swapped in.
    pub pulse: bool,
}

impl BadgeView {
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        let count = cart.item_count();
        Self {
            count,
            mobile_hidden: count == 0,
            pulse: false,
        }
    }

    /// Mark the badges for the post-add pulse animation.
    #[must_use]
    pub const fn pulse(mut self) -> Self {
        self.pulse = true;
        self
    }

    #[must_use]
    pub fn aria_label(&self) -> String {
        match self.count {
            1 => "Cart: 1 item".to_string(),
            n => format!("Cart: {n} items"),
        }
    }

    /// Response header carrying [`Self::hx_trigger`].
    ///
    /// The pulse must fire after the out-of-band badges replace the old
    /// ones, so a pulsing update uses `HX-Trigger-After-Swap`.
    #[must_use]
    pub const fn trigger_header(&self) -> &'static str {
        if self.pulse {
            "HX-Trigger-After-Swap"
        } else {
            "HX-Trigger"
        }
    }

    /// Trigger header value for this badge update.
    #[must_use]
    pub fn hx_trigger(&self) -> String {
        if self.pulse {
            json!({
                CART_UPDATED_EVENT: {},
                CART_PULSE_EVENT: { "durationMs": PULSE_DURATION_MS },
            })
            .to_string()
        } else {
            CART_UPDATED_EVENT.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_records_core::{CartCandidate, ProductId};

    use super::*;

    #[test]
    fn test_empty_cart_hides_mobile_badge() {
        let badge = BadgeView::from_cart(&Cart::default());
        assert_eq!(badge.count, 0);
        assert!(badge.mobile_hidden);
        assert!(!badge.pulse);
        assert_eq!(badge.aria_label(), "Cart: 0 items");
    }

    #[test]
    fn test_count_sums_quantities() {
        let mut cart = Cart::default();
        cart.add(&CartCandidate::new(1, 10.0).with_quantity(2)).unwrap();
        cart.add(&CartCandidate::new(2, 5.0)).unwrap();

        let badge = BadgeView::from_cart(&cart);
        assert_eq!(badge.count, 3);
        assert!(!badge.mobile_hidden);

        cart.change_quantity(ProductId::new(2), -1);
        cart.change_quantity(ProductId::new(1), -1);
        let badge = BadgeView::from_cart(&cart);
        assert_eq!(badge.count, 1);
        assert_eq!(badge.aria_label(), "Cart: 1 item");
    }

    #[test]
    fn test_hx_trigger_carries_pulse_only_after_add() {
        let badge = BadgeView::from_cart(&Cart::default());
        assert_eq!(badge.hx_trigger(), "cart-updated");
        assert_eq!(badge.trigger_header(), "HX-Trigger");
        assert_eq!(badge.pulse().trigger_header(), "HX-Trigger-After-Swap");

        let trigger: serde_json::Value = serde_json::from_str(&badge.pulse().hx_trigger()).unwrap();
        assert_eq!(
            trigger,
            json!({"cart-updated": {}, "cart-pulse": {"durationMs": 650}})
        );
    }
}
