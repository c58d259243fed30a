//! Grocer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartEngine, CartError, CartLineItem, CartState},
    catalog::{Catalog, CatalogError, InMemoryCatalog},
    clock::{Clock, ManualClock, SystemClock},
    config::{FulfilmentSchedule, OrderConfig, StorageKeys, StorefrontConfig, ValidationMode},
    orders::{
        CustomerInfo, Order, OrderEngine, OrderError, OrderItem, OrderStatus, OrderUuid,
        PaymentMethod, ShippingAddress,
    },
    pricing::{PricingConfig, PricingError},
    products::{Locale, Product},
    reviews::{
        NewReview, RatingDistribution, Review, ReviewBook, ReviewError, ReviewUuid, SampleReview,
    },
    scheduler::{ManualScheduler, Scheduler, SchedulerError, TimerHandle, TokioScheduler},
    session::{CheckoutDetails, CheckoutError, Collaborators, Storefront},
    store::{FileStore, KeyValueStore, MemoryStore, StoreError},
    wishlist::{Wishlist, WishlistError},
};
