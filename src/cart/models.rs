//! Cart Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    pricing::{PricingConfig, line_price, round_cents},
    products::Product,
};

/// Most units a single line may hold, whatever the stock.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// One product's aggregated quantity in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product snapshot taken when the line was created
    pub product: Product,

    /// Units, always at least one
    pub quantity: u32,
}

impl CartLineItem {
    /// Line with `quantity` units of `product`.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Most units this line may hold: the stock, capped at [`MAX_LINE_QUANTITY`].
    pub fn quantity_limit(&self) -> u32 {
        quantity_limit(&self.product)
    }

    /// Price times quantity, rounded to cents.
    pub fn line_total(&self) -> Decimal {
        line_price(self.product.price, self.quantity)
    }

    /// Saving against the compare-at price for the whole line.
    pub fn line_savings(&self) -> Decimal {
        self.product.unit_savings() * Decimal::from(self.quantity)
    }
}

/// Most units of `product` a cart line may hold.
pub(crate) fn quantity_limit(product: &Product) -> u32 {
    product
        .stock
        .map_or(MAX_LINE_QUANTITY, |stock| stock.min(MAX_LINE_QUANTITY))
}

/// Cart contents and derived totals, persisted as one blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartState {
    /// Lines in insertion order, unique by product id
    pub items: Vec<CartLineItem>,

    /// Amount due
    pub total: Decimal,

    /// Units across all lines
    pub item_count: u32,

    /// Coupon discount
    pub discount: Decimal,

    /// Sum of line prices before discount and delivery
    pub subtotal: Decimal,

    /// Delivery fee
    pub delivery_fee: Decimal,

    /// Code of the applied coupon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_coupon: Option<String>,
}

impl CartState {
    /// Recompute the derived totals from the lines and the stored discount.
    ///
    /// Runs in a fixed order, rounding at each step: item count, subtotal, discount clamp,
    /// delivery fee, total.
    ///
    /// The delivery fee rule (free from the threshold, flat fee below it) applies only to carts
    /// with at least one line. An empty cart owes nothing, delivery included, so its fee and total
    /// are both zero even though its zero subtotal sits below the threshold.
    pub fn recompute(&mut self, pricing: &PricingConfig) {
        self.item_count = self
            .items
            .iter()
            .fold(0, |count: u32, line| count.saturating_add(line.quantity));

        self.subtotal = round_cents(
            self.items
                .iter()
                .map(|line| line.product.price * Decimal::from(line.quantity))
                .sum(),
        );

        self.discount = self.discount.clamp(Decimal::ZERO, self.subtotal);

        self.delivery_fee = if self.items.is_empty() {
            Decimal::ZERO
        } else {
            pricing.delivery_fee_for(self.subtotal)
        };

        self.total =
            round_cents(self.subtotal - self.discount + self.delivery_fee).max(Decimal::ZERO);
    }

    /// Repair a blob loaded from storage: drop empty lines, merge duplicates and clamp to stock.
    pub(crate) fn normalize(&mut self) {
        let mut lines: Vec<CartLineItem> = Vec::with_capacity(self.items.len());

        for line in self.items.drain(..) {
            if line.quantity == 0 {
                continue;
            }

            if let Some(existing) = lines
                .iter_mut()
                .find(|existing| existing.product.id == line.product.id)
            {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                lines.push(line);
            }
        }

        for line in &mut lines {
            line.quantity = line.quantity.min(line.quantity_limit());
        }

        lines.retain(|line| line.quantity > 0);
        self.items = lines;
    }

    /// Line for `product_id`.
    pub fn line(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, price: Decimal) -> Product {
        Product::new(id, id, id, price)
    }

    #[test]
    fn recompute_below_threshold_adds_delivery() {
        let mut state = CartState {
            items: vec![CartLineItem::new(product("a", Decimal::TEN), 2)],
            ..CartState::default()
        };

        state.recompute(&PricingConfig::default());

        assert_eq!(state.item_count, 2);
        assert_eq!(state.subtotal, Decimal::from(20));
        assert_eq!(state.delivery_fee, Decimal::from(20));
        assert_eq!(state.total, Decimal::from(40));
    }

    #[test]
    fn item_count_saturates_instead_of_overflowing() {
        let mut state = CartState {
            items: vec![
                CartLineItem::new(product("a", Decimal::ONE), u32::MAX),
                CartLineItem::new(product("b", Decimal::ONE), u32::MAX),
            ],
            ..CartState::default()
        };

        state.recompute(&PricingConfig::default());

        assert_eq!(state.item_count, u32::MAX);
    }

    #[test]
    fn normalize_caps_restored_lines() {
        let mut state = CartState {
            items: vec![CartLineItem::new(product("a", Decimal::ONE), 50_000)],
            ..CartState::default()
        };

        state.normalize();

        assert_eq!(
            state.line("a").map(|line| line.quantity),
            Some(MAX_LINE_QUANTITY)
        );
    }

    #[test]
    fn recompute_rounds_subtotal_once_over_raw_line_sum() {
        // 3 x 0.335 = 1.005 -> 1.01, while rounding each unit first would give 1.02.
        let mut state = CartState {
            items: vec![CartLineItem::new(product("a", Decimal::new(335, 3)), 3)],
            ..CartState::default()
        };

        state.recompute(&PricingConfig::default());

        assert_eq!(state.subtotal, Decimal::new(101, 2));
        assert_eq!(state.total, Decimal::new(2_101, 2));
    }

    #[test]
    fn stale_discount_is_clamped_to_subtotal() {
        let mut state = CartState {
            items: vec![CartLineItem::new(product("a", Decimal::from(5)), 1)],
            discount: Decimal::from(50),
            ..CartState::default()
        };

        state.recompute(&PricingConfig::default());

        assert_eq!(state.discount, Decimal::from(5));
        assert_eq!(state.total, Decimal::from(20));
    }

    #[test]
    fn empty_cart_owes_nothing() {
        let mut state = CartState {
            discount: Decimal::TEN,
            ..CartState::default()
        };

        state.recompute(&PricingConfig::default());

        assert_eq!(state.delivery_fee, Decimal::ZERO);
        assert_eq!(state.discount, Decimal::ZERO);
        assert_eq!(state.total, Decimal::ZERO);
    }

    #[test]
    fn normalize_repairs_loaded_lines() {
        let limited = product("limited", Decimal::ONE).with_stock(3);
        let mut state = CartState {
            items: vec![
                CartLineItem::new(product("a", Decimal::ONE), 0),
                CartLineItem::new(limited.clone(), 2),
                CartLineItem::new(limited, 4),
                CartLineItem::new(product("b", Decimal::ONE), 1),
            ],
            ..CartState::default()
        };

        state.normalize();

        let ids: Vec<_> = state.items.iter().map(|l| l.product.id.as_str()).collect();

        assert_eq!(ids, ["limited", "b"]);
        assert_eq!(state.line("limited").map(|l| l.quantity), Some(3));
    }

    #[test]
    fn decodes_storefront_blob_without_coupon() -> TestResult {
        let json = r#"{
            "items": [{ "product": { "id": "1", "name": "خبز", "price": 2.5 }, "quantity": 2 }],
            "total": 25,
            "itemCount": 2,
            "discount": 0,
            "subtotal": 5,
            "deliveryFee": 20
        }"#;

        let state: CartState = serde_json::from_str(json)?;

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.item_count, 2);
        assert_eq!(state.applied_coupon, None);

        Ok(())
    }

    #[test]
    fn line_savings_scale_with_quantity() {
        let line = CartLineItem::new(
            product("a", Decimal::new(975, 2)).with_compare_at_price(Decimal::from(11)),
            4,
        );

        assert_eq!(line.line_savings(), Decimal::from(5));
        assert_eq!(line.line_total(), Decimal::from(39));
    }
}
