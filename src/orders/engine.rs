//! Order Lifecycle Engine

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::{
    cart::CartState,
    clock::Clock,
    config::{OrderConfig, ValidationMode},
    orders::{
        CustomerInfo, Order, OrderError, OrderItem, OrderStatus, OrderUuid, PaymentMethod,
        ShippingAddress, numbers,
    },
    scheduler::{Scheduler, TimerHandle},
    store::{self, KeyValueStore},
};

struct OrderBook {
    orders: Vec<Order>,
    current: Option<OrderUuid>,
    timers: FxHashMap<u64, TimerHandle>,
    next_timer: u64,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
    mode: ValidationMode,
}

impl OrderBook {
    fn find(&self, order_id: OrderUuid) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == order_id)
    }

    fn transition(
        &mut self,
        order_id: OrderUuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderError> {
        let now = self.clock.now();
        let strict = self.mode.is_strict();

        let Some(order) = self.orders.iter_mut().find(|order| order.id == order_id) else {
            return Ok(None);
        };

        let from = order.status;

        if strict && from != status && !from.can_transition_to(status) {
            return Err(OrderError::InvalidTransition {
                order: order.order_number.clone(),
                from,
                to: status,
            });
        }

        order.apply_status(status, now);

        let updated = order.clone();

        info!(
            order_number = %updated.order_number,
            %from,
            to = %status,
            "updated order status"
        );

        self.persist()?;

        Ok(Some(updated))
    }

    fn persist(&self) -> Result<(), OrderError> {
        match store::save(self.store.as_ref(), &self.key, &self.orders) {
            Err(error) if self.mode.is_strict() => Err(error.into()),
            _ => Ok(()),
        }
    }
}

/// Creates orders from cart snapshots and drives them through the fulfilment lifecycle.
///
/// After creation each order is moved to `confirmed`, `processing` and `shipped` by one-shot
/// timers on the injected [`Scheduler`]. Timer callbacks only hold a weak reference to the
/// order list, and every outstanding timer is cancelled on [`OrderEngine::shutdown`] or drop.
pub struct OrderEngine {
    shared: Arc<Mutex<OrderBook>>,
    scheduler: Arc<dyn Scheduler>,
    config: OrderConfig,
}

impl OrderEngine {
    /// Create an engine with no order history.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        key: impl Into<String>,
        config: OrderConfig,
        mode: ValidationMode,
    ) -> Self {
        let book = OrderBook {
            orders: Vec::new(),
            current: None,
            timers: FxHashMap::default(),
            next_timer: 0,
            store,
            clock,
            key: key.into(),
            mode,
        };

        Self {
            shared: Arc::new(Mutex::new(book)),
            scheduler,
            config,
        }
    }

    /// Restore the order history persisted under `key`, starting empty when it is missing or
    /// malformed. Restored orders keep their status; no timers are resumed.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        key: impl Into<String>,
        config: OrderConfig,
        mode: ValidationMode,
    ) -> Self {
        let engine = Self::new(store, clock, scheduler, key, config, mode);

        {
            let mut book = engine.lock();
            let orders: Vec<Order> = store::load_or_default(book.store.as_ref(), &book.key);

            debug!(key = %book.key, orders = orders.len(), "loaded orders");

            book.orders = orders;
        }

        engine
    }

    /// Place an order for the cart snapshot and schedule its fulfilment.
    ///
    /// Items, unit prices and the total are copied, so later cart changes never touch the order.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`OrderError::Store`] when the order list cannot be persisted. The
    /// order is then discarded and nothing is scheduled.
    #[tracing::instrument(
        name = "orders.create_order",
        skip_all,
        fields(
            order_number = tracing::field::Empty,
            item_count = cart.item_count,
            total = %cart.total
        ),
        err
    )]
    pub fn create_order(
        &self,
        cart: &CartState,
        shipping_address: ShippingAddress,
        customer_info: CustomerInfo,
        payment_method: PaymentMethod,
    ) -> Result<Order, OrderError> {
        let mut book = self.lock();
        let now = book.clock.now();

        let order = Order {
            id: OrderUuid::now_v7(),
            order_number: numbers::order_number(
                &self.config.number_prefix,
                now,
                &mut rand::thread_rng(),
            ),
            items: cart.items.iter().map(OrderItem::from).collect(),
            total: cart.total,
            status: OrderStatus::Pending,
            order_date: now,
            delivery_date: None,
            shipping_address,
            customer_info,
            payment_method,
            tracking_number: None,
        };

        tracing::Span::current().record(
            "order_number",
            tracing::field::display(&order.order_number),
        );

        let previous = book.current.replace(order.id);
        book.orders.insert(0, order.clone());

        if let Err(error) = book.persist() {
            book.orders.retain(|placed| placed.id != order.id);
            book.current = previous;

            return Err(error);
        }

        let schedule = self.config.schedule;

        for (delay, status) in [
            (schedule.confirm_after, OrderStatus::Confirmed),
            (schedule.process_after, OrderStatus::Processing),
            (schedule.ship_after, OrderStatus::Shipped),
        ] {
            self.schedule_transition(&mut book, order.id, delay, status);
        }

        info!(order_id = %order.id, order_number = %order.order_number, "created order");

        Ok(order)
    }

    /// Set the status of an order. Returns `None` for unknown ids.
    ///
    /// Setting the current status again is a no-op change. Lenient engines accept any status;
    /// strict engines only accept moves [`OrderStatus::can_transition_to`] allows.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`OrderError::InvalidTransition`] for illegal moves and
    /// [`OrderError::Store`] when the order list cannot be persisted.
    #[tracing::instrument(
        name = "orders.update_status",
        skip_all,
        fields(%order_id, %status),
        err
    )]
    pub fn update_status(
        &self,
        order_id: OrderUuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderError> {
        self.lock().transition(order_id, status)
    }

    /// Cancel an order. Pending fulfilment timers are left in place.
    ///
    /// # Errors
    ///
    /// As for [`OrderEngine::update_status`].
    pub fn cancel_order(&self, order_id: OrderUuid) -> Result<Option<Order>, OrderError> {
        self.update_status(order_id, OrderStatus::Cancelled)
    }

    /// Order by id.
    pub fn order(&self, order_id: OrderUuid) -> Option<Order> {
        self.lock().find(order_id).cloned()
    }

    /// Order by customer-facing number.
    pub fn order_by_number(&self, order_number: &str) -> Option<Order> {
        self.lock()
            .orders
            .iter()
            .find(|order| order.order_number == order_number)
            .cloned()
    }

    /// Orders currently in `status`, newest first.
    pub fn orders_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.lock()
            .orders
            .iter()
            .filter(|order| order.status == status)
            .cloned()
            .collect()
    }

    /// Every order, newest first.
    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    /// The order placed most recently through this engine, with its latest status.
    pub fn current_order(&self) -> Option<Order> {
        let book = self.lock();

        book.current.and_then(|id| book.find(id)).cloned()
    }

    /// Number of fulfilment timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.lock().timers.len()
    }

    /// Cancel every outstanding fulfilment timer.
    pub fn shutdown(&self) {
        let timers: Vec<TimerHandle> = {
            let mut book = self.lock();

            book.timers.drain().map(|(_, handle)| handle).collect()
        };

        if !timers.is_empty() {
            debug!(count = timers.len(), "cancelling fulfilment timers");
        }

        for handle in timers {
            handle.cancel();
        }
    }

    fn schedule_transition(
        &self,
        book: &mut OrderBook,
        order_id: OrderUuid,
        delay: Duration,
        status: OrderStatus,
    ) {
        let timer_id = book.next_timer;
        book.next_timer += 1;

        let shared: Weak<Mutex<OrderBook>> = Arc::downgrade(&self.shared);

        let handle = self.scheduler.schedule_once(
            delay,
            Box::new(move || {
                let Some(shared) = shared.upgrade() else {
                    return;
                };

                let mut book = shared.lock().unwrap_or_else(PoisonError::into_inner);

                book.timers.remove(&timer_id);

                if let Err(error) = book.transition(order_id, status) {
                    warn!(%order_id, %status, %error, "rejected scheduled status change");
                }
            }),
        );

        book.timers.insert(timer_id, handle);
    }

    fn lock(&self) -> MutexGuard<'_, OrderBook> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for OrderEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = self.lock();

        f.debug_struct("OrderEngine")
            .field("orders", &book.orders.len())
            .field("current", &book.current)
            .field("pending_timers", &book.timers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
