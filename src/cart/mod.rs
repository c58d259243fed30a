//! Cart

pub mod engine;
pub mod errors;
pub mod models;

pub use engine::CartEngine;
pub use errors::CartError;
pub use models::{CartLineItem, CartState, MAX_LINE_QUANTITY};
