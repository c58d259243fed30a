use std::io::Write;

use clap::{Args, Subcommand};

use crate::{context::AppContext, errors::CliError, render};

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// List products
    List {
        /// Only products in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product with its rating
    Show {
        /// Product id
        id: String,
    },
}

pub(crate) fn run(
    command: CatalogCommand,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let storefront = &context.storefront;

    match command.command {
        CatalogSubcommand::List { category } => {
            let products: Vec<_> = storefront
                .catalog()
                .products()
                .into_iter()
                .filter(|product| {
                    category
                        .as_deref()
                        .is_none_or(|category| product.category == category)
                })
                .collect();

            writeln!(
                out,
                "{}",
                render::products_table(&products, context.locale, context.currency)
            )?;
        }
        CatalogSubcommand::Show { id } => {
            let product = storefront
                .catalog()
                .product(&id)
                .ok_or_else(|| CliError::UnknownProduct(id.clone()))?;

            writeln!(
                out,
                "{}",
                render::products_table(
                    std::slice::from_ref(&product),
                    context.locale,
                    context.currency
                )
            )?;

            if let Some(description) = product.description_in(context.locale) {
                writeln!(out, "{description}")?;
            }

            let reviews = storefront.reviews();

            writeln!(
                out,
                "{}",
                render::rating_summary(
                    reviews.average_rating(&id),
                    &reviews.rating_distribution(&id)
                )
            )?;

            if storefront.wishlist().contains(&id) {
                writeln!(out, "♥ on your wishlist")?;
            }
        }
    }

    Ok(())
}
