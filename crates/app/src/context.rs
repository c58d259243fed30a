//! App Context

use std::sync::Arc;

use grocer::{
    catalog::InMemoryCatalog,
    clock::SystemClock,
    config::StorefrontConfig,
    pricing,
    products::Locale,
    reviews::samples,
    scheduler::TokioScheduler,
    session::{Collaborators, Storefront},
    store::FileStore,
};
use rusty_money::iso::Currency;
use tracing::debug;

use crate::{config::StorefrontArgs, errors::CliError};

/// Storefront plus display preferences for one CLI invocation.
#[derive(Debug)]
pub(crate) struct AppContext {
    pub(crate) storefront: Storefront,
    pub(crate) currency: &'static Currency,
    pub(crate) locale: Locale,
}

impl AppContext {
    /// Open the storefront persisted under the configured data directory.
    ///
    /// Must be called inside a tokio runtime; fulfilment timers run on it.
    pub(crate) fn open(args: &StorefrontArgs) -> Result<Self, CliError> {
        let currency = pricing::currency(&args.currency)?;
        let catalog = InMemoryCatalog::from_yaml_file(&args.catalog)?;
        let sample_reviews = samples::from_yaml_file(&args.sample_reviews)?;

        debug!(
            catalog = %args.catalog.display(),
            products = catalog.len(),
            data_dir = %args.data_dir.display(),
            "opening storefront"
        );

        let collaborators = Collaborators {
            store: Arc::new(FileStore::new(&args.data_dir)),
            catalog: Arc::new(catalog),
            clock: Arc::new(SystemClock),
            scheduler: Arc::new(TokioScheduler::current()?),
        };

        Ok(Self {
            storefront: Storefront::open(
                StorefrontConfig {
                    sample_reviews,
                    ..args.storefront_config()
                },
                collaborators,
            ),
            currency,
            locale: args.locale,
        })
    }
}
