//! CLI errors

use std::io;

use grocer::{
    cart::CartError,
    catalog::CatalogError,
    orders::OrderError,
    pricing::PricingError,
    reviews::{ReviewError, SampleError},
    scheduler::SchedulerError,
    session::CheckoutError,
    wishlist::WishlistError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to load catalog")]
    Catalog(#[from] CatalogError),

    #[error("failed to load sample reviews")]
    Samples(#[from] SampleError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("failed to start fulfilment timers")]
    Scheduler(#[from] SchedulerError),

    #[error("cart update failed: {0}")]
    Cart(#[from] CartError),

    #[error("checkout failed: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("order update failed: {0}")]
    Order(#[from] OrderError),

    #[error("review update failed: {0}")]
    Review(#[from] ReviewError),

    #[error("wishlist update failed: {0}")]
    Wishlist(#[from] WishlistError),

    #[error("no product with id {0:?}")]
    UnknownProduct(String),

    #[error("no order with id or number {0:?}")]
    UnknownOrder(String),

    #[error("no review with id {0}")]
    UnknownReview(String),

    #[error("failed to write output")]
    Output(#[from] io::Error),
}
