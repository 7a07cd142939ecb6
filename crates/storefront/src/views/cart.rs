//! Cart modal and cart page view.

use garden_records_core::{Cart, CartLine, CurrencyCode, Price, format_amount};

/// One cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub kind: String,
    pub quantity: u32,
    /// Line total with currency, e.g. "279.98 RON".
    pub line_price: String,
    pub image_url: Option<String>,
}

impl CartItemView {
    fn from_line(line: &CartLine, currency: CurrencyCode) -> Self {
        Self {
            id: line.id.as_i32(),
            name: line.display_name().to_string(),
            kind: line.kind.clone(),
            quantity: line.quantity,
            line_price: Price::new(line.line_total(), currency).display(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// Rows in stored order.
    pub items: Vec<CartItemView>,
    /// Grand total with two decimals and no currency, e.g. "279.98".
    pub total: String,
    pub currency: &'static str,
    pub item_count: u32,
    pub is_empty: bool,
    pub checkout_enabled: bool,
}

impl CartView {
    #[must_use]
    pub fn from_cart(cart: &Cart, currency: CurrencyCode) -> Self {
        let items: Vec<CartItemView> = cart
            .lines()
            .iter()
            .map(|line| CartItemView::from_line(line, currency))
            .collect();
        let is_empty = items.is_empty();

        Self {
            items,
            total: format_amount(cart.total()),
            currency: currency.code(),
            item_count: cart.item_count(),
            is_empty,
            checkout_enabled: !is_empty,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_records_core::CartCandidate;

    use super::*;

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from_cart(&Cart::default(), CurrencyCode::RON);
        assert!(view.is_empty);
        assert!(!view.checkout_enabled);
        assert_eq!(view.total, "0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_rows_keep_stored_order_and_format_prices() {
        let mut cart = Cart::default();
        cart.add(&CartCandidate::new(3, 49.99).with_kind("CD")).unwrap();
        cart.add(&CartCandidate::new(1, 139.99).with_name("Abbey Road")).unwrap();
        cart.add(&CartCandidate::new(1, 139.99)).unwrap();

        let view = CartView::from_cart(&cart, CurrencyCode::RON);
        let ids: Vec<i32> = view.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![3, 1]);

        let first = view.items.first().unwrap();
        assert_eq!(first.name, "Product");
        assert_eq!(first.kind, "CD");

        let second = view.items.get(1).unwrap();
        assert_eq!(second.quantity, 2);
        assert_eq!(second.line_price, "279.98 RON");

        assert_eq!(view.total, "329.97");
        assert_eq!(view.item_count, 3);
        assert!(view.checkout_enabled);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut cart = Cart::default();
        cart.add(&CartCandidate::new(7, 12.5).with_quantity(3)).unwrap();

        let first = CartView::from_cart(&cart, CurrencyCode::EUR);
        let second = CartView::from_cart(&cart, CurrencyCode::EUR);
        assert_eq!(first, second);
        assert_eq!(first.total, "37.50");
        assert_eq!(first.items.first().unwrap().line_price, "37.50 EUR");
    }
}
