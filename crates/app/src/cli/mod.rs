use std::io;

use clap::{Parser, Subcommand};

use crate::{
    config::{LoggingArgs, StorefrontArgs},
    context::AppContext,
    errors::CliError,
};

mod cart;
mod catalog;
mod checkout;
mod orders;
mod reviews;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "grocer", about = "Grocery storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) storefront: StorefrontArgs,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse products
    Catalog(catalog::CatalogCommand),
    /// Manage the cart
    Cart(cart::CartCommand),
    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),
    /// Inspect and update orders
    Orders(orders::OrdersCommand),
    /// Read and write product reviews
    Reviews(reviews::ReviewsCommand),
    /// Manage the wishlist
    Wishlist(wishlist::WishlistCommand),
}

impl Cli {
    /// Parse arguments, reading a `.env` file first if present.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), CliError> {
        let mut context = AppContext::open(&self.storefront)?;
        let mut out = io::stdout();

        let result = match self.command {
            Commands::Catalog(command) => catalog::run(command, &context, &mut out),
            Commands::Cart(command) => cart::run(command, &mut context, &mut out),
            Commands::Checkout(args) => checkout::run(args, &mut context, &mut out).await,
            Commands::Orders(command) => orders::run(command, &context, &mut out),
            Commands::Reviews(command) => reviews::run(command, &mut context, &mut out),
            Commands::Wishlist(command) => wishlist::run(command, &mut context, &mut out),
        };

        context.storefront.shutdown();

        result
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../fixtures/products/grocery.yml"
    );

    const SAMPLE_REVIEWS: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../fixtures/reviews/sample.yml"
    );

    fn parse(data_dir: &Path, args: &[&str]) -> Result<Cli, clap::Error> {
        let data_dir = data_dir.to_string_lossy();
        let mut argv = vec![
            "grocer",
            "--data-dir",
            &*data_dir,
            "--catalog",
            CATALOG,
            "--sample-reviews",
            SAMPLE_REVIEWS,
        ];

        argv.extend_from_slice(args);

        Cli::try_parse_from(argv)
    }

    #[tokio::test]
    async fn cart_commands_persist_between_runs() -> TestResult {
        let dir = tempfile::tempdir()?;

        parse(dir.path(), &["cart", "add", "1"])?.run().await?;
        parse(dir.path(), &["cart", "add", "1"])?.run().await?;
        parse(dir.path(), &["cart", "coupon", "percent", "SAVE10", "10"])?
            .run()
            .await?;

        let cli = parse(dir.path(), &["cart", "show"])?;
        let context = AppContext::open(&cli.storefront)?;
        let cart = context.storefront.cart();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.applied_coupon(), Some("SAVE10"));

        context.storefront.shutdown();

        Ok(())
    }

    #[tokio::test]
    async fn fresh_data_dir_starts_with_sample_reviews() -> TestResult {
        let dir = tempfile::tempdir()?;

        parse(dir.path(), &["reviews", "list", "1"])?.run().await?;

        let cli = parse(dir.path(), &["reviews", "summary", "1"])?;
        let context = AppContext::open(&cli.storefront)?;
        let reviews = context.storefront.reviews();

        assert_eq!(reviews.reviews().len(), 5);
        assert_eq!(reviews.reviews_for("1").len(), 2);
        assert!(
            dir.path().join("panda-reviews.json").exists(),
            "seeded reviews are persisted"
        );

        context.storefront.shutdown();

        Ok(())
    }

    #[tokio::test]
    async fn unknown_products_are_reported() -> TestResult {
        let dir = tempfile::tempdir()?;

        let result = parse(dir.path(), &["wishlist", "add", "missing"])?.run().await;

        assert!(
            matches!(result, Err(CliError::UnknownProduct(ref id)) if id == "missing"),
            "expected an unknown product error, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn negative_quantities_parse() -> TestResult {
        let dir = tempfile::tempdir()?;

        parse(dir.path(), &["cart", "set", "1", "-3"])?;
        parse(
            dir.path(),
            &[
                "reviews",
                "add",
                "1",
                "--user-id",
                "u1",
                "--user-name",
                "Mona",
                "--rating",
                "-1",
                "--title",
                "Stale",
                "--comment",
                "Old bread",
            ],
        )?;

        Ok(())
    }
}
