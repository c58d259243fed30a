//! Cart errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Cart engine errors.
///
/// Only returned in strict mode; lenient carts clamp or ignore the same requests.
#[derive(Debug, Error)]
pub enum CartError {
    /// The request would put more units in the cart than are in stock.
    #[error("only {available} of product {product_id} in stock, {requested} requested")]
    OutOfStock {
        /// Product id
        product_id: String,
        /// Quantity the line would have reached
        requested: u32,
        /// Stock limit
        available: u32,
    },

    /// Negative quantity.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity {
        /// Product id
        product_id: String,
        /// Requested quantity
        quantity: i64,
    },

    /// Coupon value out of range.
    #[error("coupon {code} has an invalid value {value}")]
    InvalidCoupon {
        /// Coupon code
        code: String,
        /// Rejected percentage or amount
        value: Decimal,
    },

    /// The cart could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}
