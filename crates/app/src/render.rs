//! Table rendering

use grocer::{
    cart::CartEngine,
    orders::Order,
    pricing::to_money,
    products::{Locale, Product},
    reviews::{RatingDistribution, Review},
};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Amount formatted in the display currency.
pub(crate) fn money(amount: Decimal, currency: &'static Currency) -> String {
    to_money(amount, currency).to_string()
}

pub(crate) fn products_table(
    products: &[Product],
    locale: Locale,
    currency: &'static Currency,
) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Unit", "Price", "Was", "Stock"]);

    for product in products {
        builder.push_record([
            product.id.clone(),
            product.name_in(locale).to_string(),
            product.unit.clone(),
            money(product.price, currency),
            product
                .compare_at_price
                .filter(|compare_at| *compare_at > product.price)
                .map(|compare_at| money(compare_at, currency))
                .unwrap_or_default(),
            product
                .stock
                .map_or_else(|| "∞".to_string(), |stock| stock.to_string()),
        ]);
    }

    let mut table = builder.build();

    table
        .with(Style::rounded())
        .modify(Columns::new(3..6), Alignment::right());

    table.to_string()
}

pub(crate) fn cart_table(cart: &CartEngine, locale: Locale, currency: &'static Currency) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Item", "Qty", "Unit Price", "Line Total"]);

    for line in cart.items() {
        builder.push_record([
            line.product.id.clone(),
            line.product.name_in(locale).to_string(),
            line.quantity.to_string(),
            money(line.product.price, currency),
            money(line.line_total(), currency),
        ]);
    }

    let mut table = builder.build();

    table
        .with(Style::rounded())
        .modify(Columns::new(2..5), Alignment::right());

    let mut summary = Builder::default();

    summary.push_record(["Items".to_string(), cart.item_count().to_string()]);
    summary.push_record(["Subtotal".to_string(), money(cart.subtotal(), currency)]);

    if !cart.discount().is_zero() {
        let label = match cart.applied_coupon() {
            Some(code) => format!("Discount ({code})"),
            None => "Discount".to_string(),
        };

        summary.push_record([label, format!("-{}", money(cart.discount(), currency))]);
    }

    summary.push_record(["Delivery".to_string(), money(cart.delivery_fee(), currency)]);
    summary.push_record(["Total".to_string(), money(cart.total(), currency)]);

    let savings = cart.total_savings();

    if !savings.is_zero() {
        summary.push_record(["You save".to_string(), money(savings, currency)]);
    }

    let remaining = cart.amount_for_free_delivery();

    if !remaining.is_zero() {
        summary.push_record([
            "Until free delivery".to_string(),
            money(remaining, currency),
        ]);
    }

    let mut summary = summary.build();

    summary
        .with(Style::blank())
        .modify(Columns::last(), Alignment::right());

    format!("{table}\n{summary}")
}

pub(crate) fn orders_table(orders: &[Order], currency: &'static Currency) -> String {
    if orders.is_empty() {
        return "No orders".to_string();
    }

    let mut builder = Builder::default();

    builder.push_record(["Number", "Placed", "Status", "Items", "Total"]);

    for order in orders {
        builder.push_record([
            order.order_number.clone(),
            order.order_date.strftime("%Y-%m-%d %H:%M").to_string(),
            order.status.to_string(),
            order.item_count().to_string(),
            money(order.total, currency),
        ]);
    }

    let mut table = builder.build();

    table
        .with(Style::rounded())
        .modify(Columns::new(3..5), Alignment::right());

    table.to_string()
}

pub(crate) fn order_details(order: &Order, locale: Locale, currency: &'static Currency) -> String {
    let mut header = Builder::default();

    header.push_record(["Order".to_string(), order.order_number.clone()]);
    header.push_record(["Id".to_string(), order.id.to_string()]);
    header.push_record(["Status".to_string(), order.status.to_string()]);
    header.push_record(["Placed".to_string(), order.order_date.to_string()]);

    if let Some(delivered) = order.delivery_date {
        header.push_record(["Delivered".to_string(), delivered.to_string()]);
    }

    if let Some(tracking) = &order.tracking_number {
        header.push_record(["Tracking".to_string(), tracking.clone()]);
    }

    header.push_record(["Customer".to_string(), order.customer_info.full_name()]);

    let address = &order.shipping_address;

    header.push_record([
        "Ship to".to_string(),
        [
            address.street.as_str(),
            address.city.as_str(),
            address.state.as_str(),
            address.zip_code.as_str(),
            address.country.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", "),
    ]);
    header.push_record(["Payment".to_string(), order.payment_method.to_string()]);

    let mut header = header.build();

    header.with(Style::blank());

    let mut items = Builder::default();

    items.push_record(["Item", "Qty", "Price"]);

    for item in &order.items {
        items.push_record([
            item.product.name_in(locale).to_string(),
            item.quantity.to_string(),
            money(item.price, currency),
        ]);
    }

    items.push_record([
        "Total".to_string(),
        order.item_count().to_string(),
        money(order.total, currency),
    ]);

    let mut items = items.build();

    items
        .with(Style::rounded())
        .modify(Columns::new(1..3), Alignment::right());

    format!("{header}\n{items}")
}

pub(crate) fn reviews_table(reviews: &[&Review]) -> String {
    if reviews.is_empty() {
        return "No reviews".to_string();
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Rating", "Title", "By", "Date", "Helpful"]);

    for review in reviews {
        builder.push_record([
            review.id.to_string(),
            stars(review.rating),
            review.title.clone(),
            review.user_name.clone(),
            review.date.strftime("%Y-%m-%d").to_string(),
            review.helpful.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());

    table.to_string()
}

pub(crate) fn rating_summary(average: Decimal, distribution: &RatingDistribution) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Average".to_string(), average.to_string()]);

    for (rating, count) in distribution.by_stars() {
        builder.push_record([stars(rating), count.to_string()]);
    }

    let mut table = builder.build();

    table
        .with(Style::blank())
        .modify(Columns::last(), Alignment::right());

    table.to_string()
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));

    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use grocer::{
        config::ValidationMode,
        pricing::PricingConfig,
        store::MemoryStore,
    };
    use rusty_money::iso::EGP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn products_table_uses_locale_and_marks_sales() {
        let products = [
            Product::new("1", "خبز أبيض", "White Bread", Decimal::new(250, 2)).with_stock(50),
            Product::new("21", "زيت زيتون", "Olive Oil", Decimal::from(249))
                .with_compare_at_price(Decimal::from(279)),
        ];

        let english = products_table(&products, Locale::En, EGP);
        let arabic = products_table(&products, Locale::Ar, EGP);

        assert!(english.contains("White Bread"), "{english}");
        assert!(english.contains(&money(Decimal::from(279), EGP)), "{english}");
        assert!(english.contains('∞'), "{english}");
        assert!(arabic.contains("خبز أبيض"), "{arabic}");
    }

    #[test]
    fn cart_table_summarises_totals() -> TestResult {
        let mut cart = CartEngine::new(
            Arc::new(MemoryStore::new()),
            "grocery-cart",
            PricingConfig::default(),
            ValidationMode::Lenient,
        );

        cart.add_item(&Product::new("1", "خبز", "Bread", Decimal::TEN))?;
        cart.apply_fixed_coupon("FIVE", Decimal::from(5))?;

        let rendered = cart_table(&cart, Locale::En, EGP);

        assert!(rendered.contains("Discount (FIVE)"), "{rendered}");
        assert!(rendered.contains(&money(Decimal::from(25), EGP)), "{rendered}");
        assert!(rendered.contains("Until free delivery"), "{rendered}");

        Ok(())
    }

    #[test]
    fn empty_cart_message() {
        let cart = CartEngine::new(
            Arc::new(MemoryStore::new()),
            "grocery-cart",
            PricingConfig::default(),
            ValidationMode::Lenient,
        );

        assert_eq!(cart_table(&cart, Locale::Ar, EGP), "Cart is empty");
    }

    #[test]
    fn stars_are_capped_at_five() {
        assert_eq!(stars(4), "★★★★☆");
        assert_eq!(stars(9), "★★★★★");
    }
}
