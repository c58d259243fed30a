//! Storefront session
//!
//! One owned context per shopper: the engines, their configuration and the collaborators they
//! share. Presentation layers hold a [`Storefront`] and dispatch intents to it.

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::info;

use crate::{
    cart::{CartEngine, CartError},
    catalog::Catalog,
    clock::Clock,
    config::StorefrontConfig,
    orders::{CustomerInfo, Order, OrderEngine, OrderError, PaymentMethod, ShippingAddress},
    reviews::ReviewBook,
    scheduler::Scheduler,
    store::KeyValueStore,
    wishlist::{Wishlist, WishlistError},
};

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// The cart could not be cleared after the order was placed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The order could not be placed.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Services the engines depend on.
#[derive(Clone)]
pub struct Collaborators {
    /// Persistence for every engine
    pub store: Arc<dyn KeyValueStore>,

    /// Product lookup
    pub catalog: Arc<dyn Catalog>,

    /// Time source for order and review dates
    pub clock: Arc<dyn Clock>,

    /// Timers for simulated fulfilment
    pub scheduler: Arc<dyn Scheduler>,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Delivery and payment details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Delivery address
    pub shipping_address: ShippingAddress,

    /// Buyer
    pub customer_info: CustomerInfo,

    /// Payment method
    pub payment_method: PaymentMethod,
}

/// A shopper's storefront: cart, orders, reviews and wishlist over shared collaborators.
pub struct Storefront {
    config: StorefrontConfig,
    catalog: Arc<dyn Catalog>,
    cart: CartEngine,
    orders: OrderEngine,
    reviews: ReviewBook,
    wishlist: Wishlist,
}

impl Storefront {
    /// Restore every engine from the store.
    pub fn open(config: StorefrontConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            store,
            catalog,
            clock,
            scheduler,
        } = collaborators;

        let cart = CartEngine::load(
            Arc::clone(&store),
            config.keys.cart.clone(),
            config.pricing,
            config.mode,
        );

        let orders = OrderEngine::load(
            Arc::clone(&store),
            Arc::clone(&clock),
            scheduler,
            config.keys.orders.clone(),
            config.orders.clone(),
            config.mode,
        );

        let reviews = ReviewBook::load_or_seed(
            Arc::clone(&store),
            clock,
            config.keys.reviews.clone(),
            config.mode,
            config.sample_reviews.clone(),
        );

        let wishlist = Wishlist::load(store, config.keys.wishlist.clone(), config.mode);

        Self {
            config,
            catalog,
            cart,
            orders,
            reviews,
            wishlist,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Product catalog.
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Cart engine.
    pub fn cart(&self) -> &CartEngine {
        &self.cart
    }

    /// Cart engine, for mutation.
    pub fn cart_mut(&mut self) -> &mut CartEngine {
        &mut self.cart
    }

    /// Order engine.
    pub fn orders(&self) -> &OrderEngine {
        &self.orders
    }

    /// Review book.
    pub fn reviews(&self) -> &ReviewBook {
        &self.reviews
    }

    /// Review book, for mutation.
    pub fn reviews_mut(&mut self) -> &mut ReviewBook {
        &mut self.reviews
    }

    /// Wishlist.
    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Wishlist, for mutation.
    pub fn wishlist_mut(&mut self) -> &mut Wishlist {
        &mut self.wishlist
    }

    /// Add one unit of a catalog product to the cart. Returns `false` for unknown products.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the cart engine rejects the request.
    pub fn add_to_cart(&mut self, product_id: &str) -> Result<bool, CartError> {
        let Some(product) = self.catalog.product(product_id) else {
            return Ok(false);
        };

        self.cart.add_item(&product)?;

        Ok(true)
    }

    /// Save a catalog product to the wishlist. Returns `false` for unknown products.
    ///
    /// # Errors
    ///
    /// Returns a [`WishlistError`] when the wishlist cannot be persisted in strict mode.
    pub fn add_to_wishlist(&mut self, product_id: &str) -> Result<bool, WishlistError> {
        let Some(product) = self.catalog.product(product_id) else {
            return Ok(false);
        };

        self.wishlist.add(&product)?;

        Ok(true)
    }

    /// Toggle a catalog product on the wishlist. Returns `None` for unknown products, otherwise
    /// whether the product is now saved.
    ///
    /// # Errors
    ///
    /// Returns a [`WishlistError`] when the wishlist cannot be persisted in strict mode.
    pub fn toggle_wishlist(&mut self, product_id: &str) -> Result<Option<bool>, WishlistError> {
        let Some(product) = self.catalog.product(product_id) else {
            return Ok(None);
        };

        self.wishlist.toggle(&product).map(Some)
    }

    /// Place an order for the cart contents, then empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when there is nothing to order, otherwise any error
    /// the order or cart engine reports. The cart is only cleared once the order is placed.
    #[tracing::instrument(name = "session.checkout", skip_all, err)]
    pub fn checkout(&mut self, details: CheckoutDetails) -> Result<Order, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let CheckoutDetails {
            shipping_address,
            customer_info,
            payment_method,
        } = details;

        let snapshot = self.cart.snapshot();

        let order = self.orders.create_order(
            &snapshot,
            shipping_address,
            customer_info,
            payment_method,
        )?;

        self.cart.clear()?;

        info!(order_number = %order.order_number, total = %order.total, "checked out");

        Ok(order)
    }

    /// Cancel outstanding fulfilment timers.
    pub fn shutdown(&self) {
        self.orders.shutdown();
    }
}

impl fmt::Debug for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.config)
            .field("cart", &self.cart)
            .field("orders", &self.orders)
            .field("reviews", &self.reviews)
            .field("wishlist", &self.wishlist)
            .finish_non_exhaustive()
    }
}
