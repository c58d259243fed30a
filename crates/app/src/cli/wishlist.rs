use std::io::Write;

use clap::{Args, Subcommand};

use crate::{context::AppContext, errors::CliError, render};

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// List saved products
    List,
    /// Save a product
    Add {
        /// Product id
        id: String,
    },
    /// Forget a product
    Remove {
        /// Product id
        id: String,
    },
    /// Save a product, or forget it when already saved
    Toggle {
        /// Product id
        id: String,
    },
    /// Forget every product
    Clear,
}

pub(crate) fn run(
    command: WishlistCommand,
    context: &mut AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let storefront = &mut context.storefront;

    match command.command {
        WishlistSubcommand::List => {}
        WishlistSubcommand::Add { id } => {
            if !storefront.add_to_wishlist(&id)? {
                return Err(CliError::UnknownProduct(id));
            }
        }
        WishlistSubcommand::Remove { id } => storefront.wishlist_mut().remove(&id)?,
        WishlistSubcommand::Toggle { id } => match storefront.toggle_wishlist(&id)? {
            Some(true) => writeln!(out, "saved {id}")?,
            Some(false) => writeln!(out, "removed {id}")?,
            None => return Err(CliError::UnknownProduct(id)),
        },
        WishlistSubcommand::Clear => storefront.wishlist_mut().clear()?,
    }

    let wishlist = storefront.wishlist();

    if wishlist.is_empty() {
        writeln!(out, "Wishlist is empty")?;
    } else {
        writeln!(
            out,
            "{}",
            render::products_table(wishlist.products(), context.locale, context.currency)
        )?;
    }

    Ok(())
}
