//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartLineItem, orders::numbers::tracking_number, products::Product, uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    Pending,
    /// Accepted by the store
    Confirmed,
    /// Being picked and packed
    Processing,
    /// Handed to the courier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Abandoned before delivery
    Cancelled,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// `true` once nothing can happen to the order anymore.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Fulfilment only moves forward, possibly skipping steps, and any open order can be
    /// cancelled. Terminal orders never move.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }

        match (self.fulfilment_step(), next.fulfilment_step()) {
            (_, None) => true,
            (Some(from), Some(to)) => to > from,
            (None, Some(_)) => false,
        }
    }

    fn fulfilment_step(self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Processing => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised order status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status {0:?}")]
pub struct ParseOrderStatusError(String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();

        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or(ParseOrderStatusError(wanted))
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Card at checkout
    CreditCard,
    /// Cash to the courier
    #[default]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Kebab-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::CashOnDelivery => "cash-on-delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised payment method.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method {0:?}, expected \"credit-card\" or \"cash-on-delivery\"")]
pub struct ParsePaymentMethodError(String);

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit-card" => Ok(PaymentMethod::CreditCard),
            "cash-on-delivery" => Ok(PaymentMethod::CashOnDelivery),
            other => Err(ParsePaymentMethodError(other.to_string())),
        }
    }
}

/// Delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street and building
    pub street: String,
    /// City
    pub city: String,
    /// Governorate or state
    pub state: String,
    /// Postal code
    pub zip_code: String,
    /// Country
    pub country: String,
}

/// Contact details of the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl CustomerInfo {
    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Line of an order, priced at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product snapshot
    pub product: Product,

    /// Units ordered
    pub quantity: u32,

    /// Line price, unit price times quantity
    pub price: Decimal,
}

impl From<&CartLineItem> for OrderItem {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product: line.product.clone(),
            quantity: line.quantity,
            price: line.line_total(),
        }
    }
}

/// Placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Record id
    pub id: OrderUuid,

    /// Customer-facing number, e.g. `PANDA-123456-042`
    pub order_number: String,

    /// Lines copied from the cart
    pub items: Vec<OrderItem>,

    /// Amount charged, the cart total at checkout
    pub total: Decimal,

    /// Fulfilment status
    pub status: OrderStatus,

    /// When the order was placed
    pub order_date: Timestamp,

    /// When the order was delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<Timestamp>,

    /// Delivery address
    pub shipping_address: ShippingAddress,

    /// Buyer
    pub customer_info: CustomerInfo,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Courier tracking number, assigned when shipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl Order {
    /// Units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count: u32, item| count.saturating_add(item.quantity))
    }

    /// Set the status, stamping the tracking number on shipping and the delivery date on delivery.
    pub(crate) fn apply_status(&mut self, status: OrderStatus, now: Timestamp) {
        self.status = status;

        match status {
            OrderStatus::Shipped if self.tracking_number.is_none() => {
                self.tracking_number = Some(tracking_number(now));
            }
            OrderStatus::Delivered if self.delivery_date.is_none() => {
                self.delivery_date = Some(now);
            }
            _ => {}
        }
    }
}
