//! Orders

pub mod engine;
pub mod errors;
pub mod models;
pub mod numbers;

pub use engine::OrderEngine;
pub use errors::OrderError;
pub use models::{
    CustomerInfo, Order, OrderItem, OrderStatus, OrderUuid, ParseOrderStatusError,
    ParsePaymentMethodError, PaymentMethod, ShippingAddress,
};
