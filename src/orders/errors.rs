//! Order errors.

use thiserror::Error;

use crate::{orders::OrderStatus, store::StoreError};

/// Order engine errors.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Strict mode refused a status change the lifecycle does not allow.
    #[error("order {order} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Order number
        order: String,
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// The order list could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}
