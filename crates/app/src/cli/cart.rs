use std::io::Write;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use crate::{context::AppContext, errors::CliError, render};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
    },
    /// Remove a product entirely
    Remove {
        /// Product id
        id: String,
    },
    /// Set the quantity of a product already in the cart
    Set {
        /// Product id
        id: String,
        /// New quantity; zero removes the line
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit of a product already in the cart
    Inc {
        /// Product id
        id: String,
    },
    /// Remove one unit of a product already in the cart
    Dec {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Apply or remove a coupon
    Coupon(CouponCommand),
}

#[derive(Debug, Args)]
struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Percentage off the subtotal
    Percent {
        /// Coupon code
        code: String,
        /// Percentage, 0 to 100
        #[arg(allow_negative_numbers = true)]
        percentage: Decimal,
    },
    /// Fixed amount off the subtotal
    Fixed {
        /// Coupon code
        code: String,
        /// Amount in the display currency
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Drop the applied coupon
    Remove,
}

pub(crate) fn run(
    command: CartCommand,
    context: &mut AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let storefront = &mut context.storefront;

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { id } => {
            if !storefront.add_to_cart(&id)? {
                return Err(CliError::UnknownProduct(id));
            }
        }
        CartSubcommand::Remove { id } => storefront.cart_mut().remove_item(&id)?,
        CartSubcommand::Set { id, quantity } => {
            storefront.cart_mut().set_quantity(&id, quantity)?;
        }
        CartSubcommand::Inc { id } => storefront.cart_mut().increment_quantity(&id)?,
        CartSubcommand::Dec { id } => storefront.cart_mut().decrement_quantity(&id)?,
        CartSubcommand::Clear => storefront.cart_mut().clear()?,
        CartSubcommand::Coupon(CouponCommand { command }) => match command {
            CouponSubcommand::Percent { code, percentage } => {
                storefront
                    .cart_mut()
                    .apply_percentage_coupon(&code, percentage)?;
            }
            CouponSubcommand::Fixed { code, amount } => {
                storefront.cart_mut().apply_fixed_coupon(&code, amount)?;
            }
            CouponSubcommand::Remove => storefront.cart_mut().remove_discount()?,
        },
    }

    writeln!(
        out,
        "{}",
        render::cart_table(storefront.cart(), context.locale, context.currency)
    )?;

    Ok(())
}
