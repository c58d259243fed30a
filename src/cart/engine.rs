//! Cart Engine

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    cart::{CartError, CartLineItem, CartState, models},
    config::ValidationMode,
    pricing::{PricingConfig, percent_of, round_cents},
    products::Product,
    store::{self, KeyValueStore},
};

/// Stateful cart over a persisted [`CartState`].
///
/// Every effective mutation recomputes the totals and writes the state back to the store. In
/// lenient mode requests that cannot be honoured as asked are clamped or ignored and every
/// operation returns `Ok`; in strict mode they are rejected with a [`CartError`] and leave the
/// cart untouched.
pub struct CartEngine {
    state: CartState,
    store: Arc<dyn KeyValueStore>,
    key: String,
    pricing: PricingConfig,
    mode: ValidationMode,
}

impl CartEngine {
    /// Create an empty cart that persists under `key`.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        pricing: PricingConfig,
        mode: ValidationMode,
    ) -> Self {
        Self {
            state: CartState::default(),
            store,
            key: key.into(),
            pricing,
            mode,
        }
    }

    /// Restore the cart persisted under `key`, starting empty when it is missing or malformed.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        pricing: PricingConfig,
        mode: ValidationMode,
    ) -> Self {
        let mut engine = Self::new(store, key, pricing, mode);

        let mut state: CartState = store::load_or_default(engine.store.as_ref(), &engine.key);
        state.normalize();
        state.recompute(&engine.pricing);

        debug!(
            key = %engine.key,
            lines = state.items.len(),
            item_count = state.item_count,
            "loaded cart"
        );

        engine.state = state;
        engine
    }

    /// Add one unit of `product`, creating its line when absent.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::OutOfStock`] when the line already holds every unit in
    /// stock, and [`CartError::Store`] when the cart cannot be persisted.
    #[tracing::instrument(
        name = "cart.add_item",
        skip(self, product),
        fields(product_id = %product.id),
        err
    )]
    pub fn add_item(&mut self, product: &Product) -> Result<(), CartError> {
        let current = self.state.line(&product.id).map_or(0, |line| line.quantity);
        let requested = current.saturating_add(1);

        let available = models::quantity_limit(product);

        if requested > available {
            return self.reject(CartError::OutOfStock {
                product_id: product.id.clone(),
                requested,
                available,
            });
        }

        match self.line_mut(&product.id) {
            Some(line) => line.quantity = requested,
            None => self
                .state
                .items
                .push(CartLineItem::new(product.clone(), requested)),
        }

        debug!(quantity = requested, "added item");

        self.commit()
    }

    /// Delete the line for `product_id` regardless of its quantity.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::Store`] when the cart cannot be persisted.
    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartError> {
        let before = self.state.items.len();

        self.state
            .items
            .retain(|line| line.product.id != product_id);

        if self.state.items.len() == before {
            return Ok(());
        }

        debug!(product_id, "removed item");

        self.commit()
    }

    /// Set the quantity of an existing line, clamped to `0..=`[`CartLineItem::quantity_limit`].
    /// Zero deletes the line.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::InvalidQuantity`] for negative quantities,
    /// [`CartError::OutOfStock`] above the stock limit and [`CartError::Store`] when the cart cannot
    /// be persisted.
    #[tracing::instrument(name = "cart.set_quantity", skip(self), err)]
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CartError> {
        let Some(limit) = self.state.line(product_id).map(CartLineItem::quantity_limit) else {
            return Ok(());
        };

        if quantity < 0 && self.mode.is_strict() {
            return Err(CartError::InvalidQuantity {
                product_id: product_id.to_string(),
                quantity,
            });
        }

        let requested = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        let quantity = if requested > limit {
            if self.mode.is_strict() {
                return Err(CartError::OutOfStock {
                    product_id: product_id.to_string(),
                    requested,
                    available: limit,
                });
            }

            limit
        } else {
            requested
        };

        if quantity == 0 {
            self.state
                .items
                .retain(|line| line.product.id != product_id);
        } else if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }

        debug!(quantity, "set quantity");

        self.commit()
    }

    /// Add one unit to an existing line, up to its stock limit.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::OutOfStock`] at the stock limit and
    /// [`CartError::Store`] when the cart cannot be persisted.
    pub fn increment_quantity(&mut self, product_id: &str) -> Result<(), CartError> {
        let Some(line) = self.state.line(product_id) else {
            return Ok(());
        };

        let requested = line.quantity.saturating_add(1);

        let available = line.quantity_limit();

        if requested > available {
            return self.reject(CartError::OutOfStock {
                product_id: product_id.to_string(),
                requested,
                available,
            });
        }

        if let Some(line) = self.line_mut(product_id) {
            line.quantity = requested;
        }

        debug!(product_id, quantity = requested, "incremented quantity");

        self.commit()
    }

    /// Take one unit off an existing line, deleting it at zero.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::Store`] when the cart cannot be persisted.
    pub fn decrement_quantity(&mut self, product_id: &str) -> Result<(), CartError> {
        let Some(line) = self.line_mut(product_id) else {
            return Ok(());
        };

        line.quantity = line.quantity.saturating_sub(1);

        let quantity = line.quantity;

        if quantity == 0 {
            self.state
                .items
                .retain(|line| line.product.id != product_id);
        }

        debug!(product_id, quantity, "decremented quantity");

        self.commit()
    }

    /// Empty the cart and drop any coupon.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::Store`] when the cart cannot be persisted.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.state = CartState::default();

        debug!("cleared cart");

        self.commit()
    }

    /// Discount `percentage` percent of the current subtotal.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::InvalidCoupon`] for percentages outside `0..=100` and
    /// [`CartError::Store`] when the cart cannot be persisted.
    #[tracing::instrument(name = "cart.apply_percentage_coupon", skip(self), err)]
    pub fn apply_percentage_coupon(
        &mut self,
        code: &str,
        percentage: Decimal,
    ) -> Result<(), CartError> {
        let in_range = (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&percentage);

        if !in_range && self.mode.is_strict() {
            return Err(CartError::InvalidCoupon {
                code: code.to_string(),
                value: percentage,
            });
        }

        let percentage = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

        self.state.discount = percent_of(self.state.subtotal, percentage);
        self.state.applied_coupon = Some(code.to_string());

        debug!(discount = %self.state.discount, "applied percentage coupon");

        self.commit()
    }

    /// Discount a fixed `amount`, never more than the current subtotal.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::InvalidCoupon`] for negative amounts and
    /// [`CartError::Store`] when the cart cannot be persisted.
    #[tracing::instrument(name = "cart.apply_fixed_coupon", skip(self), err)]
    pub fn apply_fixed_coupon(&mut self, code: &str, amount: Decimal) -> Result<(), CartError> {
        if amount.is_sign_negative() && self.mode.is_strict() {
            return Err(CartError::InvalidCoupon {
                code: code.to_string(),
                value: amount,
            });
        }

        self.state.discount = round_cents(amount.clamp(Decimal::ZERO, self.state.subtotal));
        self.state.applied_coupon = Some(code.to_string());

        debug!(discount = %self.state.discount, "applied fixed coupon");

        self.commit()
    }

    /// Drop the discount and the coupon code.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CartError::Store`] when the cart cannot be persisted.
    pub fn remove_discount(&mut self) -> Result<(), CartError> {
        self.state.discount = Decimal::ZERO;
        self.state.applied_coupon = None;

        debug!("removed discount");

        self.commit()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    /// Line for `product_id`.
    pub fn line(&self, product_id: &str) -> Option<&CartLineItem> {
        self.state.line(product_id)
    }

    /// `true` when the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Units across all lines.
    pub fn item_count(&self) -> u32 {
        self.state.item_count
    }

    /// Sum of line prices.
    pub fn subtotal(&self) -> Decimal {
        self.state.subtotal
    }

    /// Coupon discount.
    pub fn discount(&self) -> Decimal {
        self.state.discount
    }

    /// Delivery fee; zero below the threshold only when the cart is empty.
    pub fn delivery_fee(&self) -> Decimal {
        self.state.delivery_fee
    }

    /// Amount due.
    pub fn total(&self) -> Decimal {
        self.state.total
    }

    /// Code of the applied coupon.
    pub fn applied_coupon(&self) -> Option<&str> {
        self.state.applied_coupon.as_deref()
    }

    /// Sale savings plus the coupon discount plus the waived delivery fee.
    pub fn total_savings(&self) -> Decimal {
        let from_products: Decimal = self
            .state
            .items
            .iter()
            .map(CartLineItem::line_savings)
            .sum();

        let from_delivery = if self.state.delivery_fee.is_zero()
            && self.pricing.qualifies_for_free_delivery(self.state.subtotal)
        {
            self.pricing.delivery_fee
        } else {
            Decimal::ZERO
        };

        round_cents(from_products + self.state.discount + from_delivery)
    }

    /// Number of distinct products.
    pub fn unique_line_count(&self) -> usize {
        self.state.items.len()
    }

    /// Subtotal per unit, zero for an empty cart.
    pub fn average_item_price(&self) -> Decimal {
        if self.state.item_count == 0 {
            return Decimal::ZERO;
        }

        round_cents(self.state.subtotal / Decimal::from(self.state.item_count))
    }

    /// How much more to spend before delivery is free.
    pub fn amount_for_free_delivery(&self) -> Decimal {
        self.pricing.remaining_for_free_delivery(self.state.subtotal)
    }

    /// Deep copy of the current state.
    pub fn snapshot(&self) -> CartState {
        self.state.clone()
    }

    /// Delivery pricing in effect.
    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLineItem> {
        self.state
            .items
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }

    fn reject(&self, error: CartError) -> Result<(), CartError> {
        if self.mode.is_strict() {
            return Err(error);
        }

        debug!(%error, "ignored cart request");

        Ok(())
    }

    fn commit(&mut self) -> Result<(), CartError> {
        self.state.recompute(&self.pricing);

        match store::save(self.store.as_ref(), &self.key, &self.state) {
            Err(error) if self.mode.is_strict() => Err(error.into()),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartEngine")
            .field("state", &self.state)
            .field("key", &self.key)
            .field("pricing", &self.pricing)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
