//! Order placement and simulated fulfilment through the public API.

use std::{sync::Arc, time::Duration};

use grocer::{
    cart::CartEngine,
    clock::{ManualClock, SystemClock},
    config::{OrderConfig, ValidationMode},
    orders::{CustomerInfo, OrderEngine, OrderError, OrderStatus, PaymentMethod, ShippingAddress},
    pricing::PricingConfig,
    products::Product,
    scheduler::{ManualScheduler, TokioScheduler},
    store::{KeyValueStore, MemoryStore},
};
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use testresult::TestResult;

struct Shop {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<ManualClock>,
    scheduler: Arc<ManualScheduler>,
    cart: CartEngine,
    orders: OrderEngine,
}

impl Shop {
    fn open(mode: ValidationMode) -> TestResult<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let scheduler = Arc::new(ManualScheduler::new());
        let clock = Arc::new(ManualClock::new(Timestamp::from_millisecond(
            1_718_000_000_000,
        )?));

        let cart = CartEngine::new(
            Arc::clone(&store),
            "panda-cart",
            PricingConfig::default(),
            mode,
        );

        let orders = OrderEngine::new(
            Arc::clone(&store),
            clock.clone(),
            scheduler.clone(),
            "panda-orders",
            OrderConfig::default(),
            mode,
        );

        Ok(Self {
            store,
            clock,
            scheduler,
            cart,
            orders,
        })
    }

    fn advance(&self, seconds: u32) {
        self.clock
            .advance(SignedDuration::from_secs(i64::from(seconds)));
        self.scheduler.advance(Duration::from_secs(u64::from(seconds)));
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        street: "12 Tahrir St".to_string(),
        city: "Cairo".to_string(),
        country: "Egypt".to_string(),
        ..ShippingAddress::default()
    }
}

fn customer() -> CustomerInfo {
    CustomerInfo {
        first_name: "Mona".to_string(),
        last_name: "Adel".to_string(),
        email: "mona@example.com".to_string(),
        phone: "+201000000000".to_string(),
    }
}

#[test]
fn clearing_the_cart_leaves_the_order_intact() -> TestResult {
    let mut shop = Shop::open(ValidationMode::Lenient)?;
    let bread = Product::new("1", "خبز", "Bread", Decimal::new(1_250, 2));

    shop.cart.add_item(&bread)?;
    shop.cart.add_item(&bread)?;

    let order = shop.orders.create_order(
        &shop.cart.snapshot(),
        address(),
        customer(),
        PaymentMethod::CashOnDelivery,
    )?;

    shop.cart.clear()?;

    let stored = shop.orders.order(order.id).ok_or("order missing")?;

    assert!(shop.cart.is_empty(), "cart should be empty");
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.item_count(), 2);
    assert_eq!(stored.total, Decimal::new(4_500, 2));
    assert_eq!(
        stored.items.first().map(|item| item.price),
        Some(Decimal::new(2_500, 2))
    );

    Ok(())
}

#[test]
fn fulfilment_walks_through_each_status() -> TestResult {
    let mut shop = Shop::open(ValidationMode::Lenient)?;

    shop.cart
        .add_item(&Product::new("7", "أرز", "Rice", Decimal::new(18_999, 2)))?;

    let order = shop.orders.create_order(
        &shop.cart.snapshot(),
        address(),
        customer(),
        PaymentMethod::CreditCard,
    )?;

    assert_eq!(order.status, OrderStatus::Pending);
    assert!(
        order.order_number.starts_with("PANDA-"),
        "unexpected order number {}",
        order.order_number
    );
    assert_eq!(shop.orders.pending_timers(), 3);

    let mut seen = Vec::new();

    for seconds in [2, 8, 20] {
        shop.advance(seconds);
        seen.push(shop.orders.order(order.id).map(|order| order.status));
    }

    assert_eq!(
        seen,
        [
            Some(OrderStatus::Confirmed),
            Some(OrderStatus::Processing),
            Some(OrderStatus::Shipped),
        ]
    );

    let shipped = shop.orders.current_order().ok_or("no current order")?;

    assert!(
        shipped.tracking_number.is_some(),
        "shipped orders carry a tracking number"
    );
    assert_eq!(shop.orders.pending_timers(), 0);

    Ok(())
}

#[test]
fn orders_are_listed_newest_first_and_by_status() -> TestResult {
    let mut shop = Shop::open(ValidationMode::Lenient)?;

    shop.cart
        .add_item(&Product::new("2", "خبز", "Bread", Decimal::new(15, 0)))?;

    let first = shop.orders.create_order(
        &shop.cart.snapshot(),
        address(),
        customer(),
        PaymentMethod::CashOnDelivery,
    )?;

    shop.advance(2);

    let second = shop.orders.create_order(
        &shop.cart.snapshot(),
        address(),
        customer(),
        PaymentMethod::CashOnDelivery,
    )?;

    let ids: Vec<_> = shop.orders.orders().iter().map(|order| order.id).collect();

    assert_eq!(ids, [second.id, first.id]);
    assert_eq!(
        shop.orders
            .orders_by_status(OrderStatus::Confirmed)
            .first()
            .map(|order| order.id),
        Some(first.id)
    );
    assert_eq!(
        shop.orders
            .order_by_number(&second.order_number)
            .map(|order| order.id),
        Some(second.id)
    );

    Ok(())
}

#[test]
fn strict_engine_keeps_cancelled_orders_cancelled() -> TestResult {
    let mut shop = Shop::open(ValidationMode::Strict)?;

    shop.cart
        .add_item(&Product::new("4", "فلفل", "Pepper", Decimal::new(2_450, 2)))?;

    let order = shop.orders.create_order(
        &shop.cart.snapshot(),
        address(),
        customer(),
        PaymentMethod::CashOnDelivery,
    )?;

    shop.orders.cancel_order(order.id)?;
    shop.advance(60);

    assert_eq!(
        shop.orders.order(order.id).map(|order| order.status),
        Some(OrderStatus::Cancelled)
    );

    let result = shop.orders.update_status(order.id, OrderStatus::Delivered);

    assert!(
        matches!(result, Err(OrderError::InvalidTransition { .. })),
        "expected an invalid transition, got {result:?}"
    );

    Ok(())
}

#[test]
fn history_is_restored_without_timers() -> TestResult {
    let mut shop = Shop::open(ValidationMode::Lenient)?;

    shop.cart
        .add_item(&Product::new("8", "مكرونة", "Pasta", Decimal::new(2_225, 2)))?;

    let order = shop.orders.create_order(
        &shop.cart.snapshot(),
        address(),
        customer(),
        PaymentMethod::CashOnDelivery,
    )?;

    shop.advance(2);

    let restored = OrderEngine::load(
        Arc::clone(&shop.store),
        Arc::new(SystemClock),
        Arc::new(ManualScheduler::new()),
        "panda-orders",
        OrderConfig::default(),
        ValidationMode::Lenient,
    );

    let reloaded = restored.order(order.id).ok_or("order missing")?;

    assert_eq!(reloaded.status, OrderStatus::Confirmed);
    assert_eq!(reloaded.customer_info, customer());
    assert_eq!(restored.pending_timers(), 0);
    assert_eq!(restored.current_order(), None);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn runtime_timers_ship_the_order() -> TestResult {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut cart = CartEngine::new(
        Arc::clone(&store),
        "panda-cart",
        PricingConfig::default(),
        ValidationMode::Lenient,
    );
    let orders = OrderEngine::new(
        store,
        Arc::new(SystemClock),
        Arc::new(TokioScheduler::current()?),
        "panda-orders",
        OrderConfig::default(),
        ValidationMode::Lenient,
    );

    cart.add_item(&Product::new("3", "كرواسون", "Croissant", Decimal::new(975, 2)))?;

    let order = orders.create_order(
        &cart.snapshot(),
        address(),
        customer(),
        PaymentMethod::CashOnDelivery,
    )?;

    tokio::time::sleep(Duration::from_secs(31)).await;

    let shipped = orders.order(order.id).ok_or("order missing")?;

    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(orders.pending_timers(), 0);

    Ok(())
}
