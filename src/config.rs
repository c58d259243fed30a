//! Engine configuration
//!
//! Plain values with defaults matching the storefront; the CLI builds them from flags and
//! environment variables.

use std::time::Duration;

use crate::{pricing::PricingConfig, reviews::SampleReview};

/// How the engines treat requests that cannot be honoured as asked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Clamp or ignore soft failures (over-stock, negative quantities, out-of-range coupons and
    /// ratings, illegal status moves) and log persistence failures without surfacing them.
    #[default]
    Lenient,

    /// Reject soft failures with an error and surface persistence failures to the caller.
    Strict,
}

impl ValidationMode {
    /// `true` for [`ValidationMode::Strict`].
    pub fn is_strict(self) -> bool {
        matches!(self, ValidationMode::Strict)
    }
}

/// Store keys for each persisted blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Cart state
    pub cart: String,

    /// Order history, newest first
    pub orders: String,

    /// Product reviews
    pub reviews: String,

    /// Wishlist products
    pub wishlist: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            cart: "grocery-cart".to_string(),
            orders: "panda-orders".to_string(),
            reviews: "panda-reviews".to_string(),
            wishlist: "panda-wishlist".to_string(),
        }
    }
}

/// Delays of the simulated fulfilment steps, measured from order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FulfilmentSchedule {
    /// `pending` -> `confirmed`
    pub confirm_after: Duration,

    /// `confirmed` -> `processing`
    pub process_after: Duration,

    /// `processing` -> `shipped`
    pub ship_after: Duration,
}

impl Default for FulfilmentSchedule {
    fn default() -> Self {
        Self {
            confirm_after: Duration::from_secs(2),
            process_after: Duration::from_secs(10),
            ship_after: Duration::from_secs(30),
        }
    }
}

/// Order engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfig {
    /// Prefix of human-readable order numbers.
    pub number_prefix: String,

    /// Simulated fulfilment delays.
    pub schedule: FulfilmentSchedule,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            number_prefix: "PANDA".to_string(),
            schedule: FulfilmentSchedule::default(),
        }
    }
}

/// Everything a storefront session needs besides its collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Delivery pricing
    pub pricing: PricingConfig,

    /// Store keys
    pub keys: StorageKeys,

    /// Order engine settings
    pub orders: OrderConfig,

    /// Lenient or strict handling of soft failures
    pub mode: ValidationMode,

    /// Reviews a fresh store starts with
    pub sample_reviews: Vec<SampleReview>,
}
