use std::{io::Write, time::Duration};

use clap::Args;
use grocer::{
    orders::{CustomerInfo, OrderStatus, PaymentMethod, ShippingAddress},
    session::CheckoutDetails,
};
use tokio::time;

use crate::{context::AppContext, errors::CliError, render};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer first name
    #[arg(long)]
    first_name: String,

    /// Customer last name
    #[arg(long)]
    last_name: String,

    /// Customer email
    #[arg(long)]
    email: String,

    /// Customer phone
    #[arg(long)]
    phone: String,

    /// Street and building
    #[arg(long)]
    street: String,

    /// City
    #[arg(long)]
    city: String,

    /// Governorate or state
    #[arg(long, default_value = "")]
    state: String,

    /// Postal code
    #[arg(long, default_value = "")]
    zip_code: String,

    /// Country
    #[arg(long, default_value = "Egypt")]
    country: String,

    /// Payment method (credit-card, cash-on-delivery)
    #[arg(long, default_value_t = PaymentMethod::CashOnDelivery)]
    payment: PaymentMethod,

    /// Stay until the order ships, printing each status change
    #[arg(long)]
    follow: bool,
}

pub(crate) async fn run(
    args: CheckoutArgs,
    context: &mut AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let details = CheckoutDetails {
        shipping_address: ShippingAddress {
            street: args.street,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            country: args.country,
        },
        customer_info: CustomerInfo {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
        },
        payment_method: args.payment,
    };

    let order = context.storefront.checkout(details)?;

    writeln!(
        out,
        "{}",
        render::order_details(&order, context.locale, context.currency)
    )?;

    if !args.follow {
        return Ok(());
    }

    let mut status = order.status;
    let mut ticker = time::interval(POLL_INTERVAL);

    while status != OrderStatus::Shipped && !status.is_terminal() {
        ticker.tick().await;

        let Some(current) = context.storefront.orders().order(order.id) else {
            break;
        };

        if current.status != status {
            let stamp = jiff::Timestamp::now().strftime("%H:%M:%S");

            match &current.tracking_number {
                Some(tracking) if current.status == OrderStatus::Shipped => {
                    writeln!(out, "[{stamp}] {} (tracking {tracking})", current.status)?;
                }
                _ => writeln!(out, "[{stamp}] {}", current.status)?,
            }

            status = current.status;
        }
    }

    Ok(())
}
