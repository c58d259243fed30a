//! Grocer
//!
//! Grocer is the cart, order and review engine behind a bilingual (Arabic/English) grocery
//! storefront: stock-aware cart pricing with coupons and a free-delivery threshold, simulated
//! order fulfilment, review aggregation and a wishlist, all persisted to a key-value store.

pub mod cart;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod reviews;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod uuids;
pub mod wishlist;
