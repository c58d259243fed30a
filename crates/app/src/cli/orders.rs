use std::io::Write;

use clap::{Args, Subcommand};
use grocer::orders::{Order, OrderEngine, OrderStatus, OrderUuid};

use crate::{context::AppContext, errors::CliError, render};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, newest first
    List {
        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Show one order
    Show {
        /// Order id or order number
        reference: String,
    },
    /// Set the status of an order
    Status {
        /// Order id or order number
        reference: String,
        /// New status
        status: OrderStatus,
    },
    /// Cancel an order
    Cancel {
        /// Order id or order number
        reference: String,
    },
}

pub(crate) fn run(
    command: OrdersCommand,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let orders = context.storefront.orders();

    match command.command {
        OrdersSubcommand::List { status } => {
            let listed = match status {
                Some(status) => orders.orders_by_status(status),
                None => orders.orders(),
            };

            writeln!(out, "{}", render::orders_table(&listed, context.currency))?;
        }
        OrdersSubcommand::Show { reference } => {
            let order = find(orders, &reference)?;

            writeln!(
                out,
                "{}",
                render::order_details(&order, context.locale, context.currency)
            )?;
        }
        OrdersSubcommand::Status { reference, status } => {
            let order = find(orders, &reference)?;
            let updated = orders
                .update_status(order.id, status)?
                .ok_or(CliError::UnknownOrder(reference))?;

            writeln!(out, "{}: {}", updated.order_number, updated.status)?;
        }
        OrdersSubcommand::Cancel { reference } => {
            let order = find(orders, &reference)?;
            let updated = orders
                .cancel_order(order.id)?
                .ok_or(CliError::UnknownOrder(reference))?;

            writeln!(out, "{}: {}", updated.order_number, updated.status)?;
        }
    }

    Ok(())
}

fn find(orders: &OrderEngine, reference: &str) -> Result<Order, CliError> {
    reference
        .parse::<OrderUuid>()
        .ok()
        .and_then(|id| orders.order(id))
        .or_else(|| orders.order_by_number(reference))
        .ok_or_else(|| CliError::UnknownOrder(reference.to_string()))
}
