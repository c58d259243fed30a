//! CLI configuration

use std::{path::PathBuf, time::Duration};

use clap::Args;
use grocer::{
    config::{FulfilmentSchedule, OrderConfig, StorageKeys, StorefrontConfig, ValidationMode},
    pricing::{DELIVERY_FEE, FREE_DELIVERY_THRESHOLD, PricingConfig},
    products::Locale,
};
use rust_decimal::Decimal;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub(crate) log_format: LogFormat,
}

/// Storefront settings.
#[derive(Debug, Args)]
pub(crate) struct StorefrontArgs {
    /// Directory holding the persisted cart, orders, reviews and wishlist
    #[arg(long, env = "GROCER_DATA_DIR", default_value = ".grocer", global = true)]
    pub(crate) data_dir: PathBuf,

    /// Product catalog (YAML)
    #[arg(
        long,
        env = "GROCER_CATALOG",
        default_value = "fixtures/products/grocery.yml",
        global = true
    )]
    pub(crate) catalog: PathBuf,

    /// Sample reviews seeded into a fresh data directory (YAML)
    #[arg(
        long,
        env = "GROCER_SAMPLE_REVIEWS",
        default_value = "fixtures/reviews/sample.yml",
        global = true
    )]
    pub(crate) sample_reviews: PathBuf,

    /// ISO currency code amounts are shown in
    #[arg(long, env = "GROCER_CURRENCY", default_value = "EGP", global = true)]
    pub(crate) currency: String,

    /// Display language (ar, en)
    #[arg(long, env = "GROCER_LOCALE", default_value_t = Locale::Ar, global = true)]
    pub(crate) locale: Locale,

    /// Reject requests that would otherwise be clamped or ignored
    #[arg(long, env = "GROCER_STRICT", global = true)]
    pub(crate) strict: bool,

    /// Subtotal at which delivery becomes free
    #[arg(long, env = "GROCER_FREE_DELIVERY_THRESHOLD", default_value_t = FREE_DELIVERY_THRESHOLD, global = true)]
    pub(crate) free_delivery_threshold: Decimal,

    /// Delivery fee below the threshold
    #[arg(long, env = "GROCER_DELIVERY_FEE", default_value_t = DELIVERY_FEE, global = true)]
    pub(crate) delivery_fee: Decimal,

    /// Prefix of order numbers
    #[arg(long, env = "GROCER_ORDER_PREFIX", default_value = "PANDA", global = true)]
    pub(crate) order_prefix: String,

    /// Seconds until a new order is confirmed
    #[arg(long, env = "GROCER_CONFIRM_AFTER", default_value_t = 2, global = true)]
    pub(crate) confirm_after: u64,

    /// Seconds until a new order is processing
    #[arg(long, env = "GROCER_PROCESS_AFTER", default_value_t = 10, global = true)]
    pub(crate) process_after: u64,

    /// Seconds until a new order is shipped
    #[arg(long, env = "GROCER_SHIP_AFTER", default_value_t = 30, global = true)]
    pub(crate) ship_after: u64,
}

impl StorefrontArgs {
    /// Engine configuration for these settings.
    pub(crate) fn storefront_config(&self) -> StorefrontConfig {
        StorefrontConfig {
            pricing: PricingConfig {
                free_delivery_threshold: self.free_delivery_threshold,
                delivery_fee: self.delivery_fee,
            },
            keys: StorageKeys::default(),
            orders: OrderConfig {
                number_prefix: self.order_prefix.clone(),
                schedule: FulfilmentSchedule {
                    confirm_after: Duration::from_secs(self.confirm_after),
                    process_after: Duration::from_secs(self.process_after),
                    ship_after: Duration::from_secs(self.ship_after),
                },
            },
            mode: if self.strict {
                ValidationMode::Strict
            } else {
                ValidationMode::Lenient
            },
            sample_reviews: Vec::new(),
        }
    }
}
