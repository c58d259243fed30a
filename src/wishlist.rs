//! Wishlist

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::debug;

use crate::{
    config::ValidationMode,
    products::Product,
    store::{self, KeyValueStore, StoreError},
};

/// Wishlist errors.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// The wishlist could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Saved products in the order they were added, unique by id.
pub struct Wishlist {
    products: Vec<Product>,
    store: Arc<dyn KeyValueStore>,
    key: String,
    mode: ValidationMode,
}

impl Wishlist {
    /// Create an empty wishlist that persists under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, mode: ValidationMode) -> Self {
        Self {
            products: Vec::new(),
            store,
            key: key.into(),
            mode,
        }
    }

    /// Restore the wishlist persisted under `key`, starting empty when missing or malformed.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, mode: ValidationMode) -> Self {
        let mut wishlist = Self::new(store, key, mode);

        let products: Vec<Product> =
            store::load_or_default(wishlist.store.as_ref(), &wishlist.key);

        for product in products {
            if !wishlist.contains(&product.id) {
                wishlist.products.push(product);
            }
        }

        wishlist
    }

    /// Save `product`; already saved products are left alone.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`WishlistError::Store`] when the wishlist cannot be persisted.
    pub fn add(&mut self, product: &Product) -> Result<(), WishlistError> {
        if self.contains(&product.id) {
            return Ok(());
        }

        self.products.push(product.clone());

        debug!(product_id = %product.id, "added to wishlist");

        self.persist()
    }

    /// Forget `product_id`.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`WishlistError::Store`] when the wishlist cannot be persisted.
    pub fn remove(&mut self, product_id: &str) -> Result<(), WishlistError> {
        let before = self.products.len();

        self.products.retain(|product| product.id != product_id);

        if self.products.len() == before {
            return Ok(());
        }

        debug!(product_id, "removed from wishlist");

        self.persist()
    }

    /// Forget every product.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`WishlistError::Store`] when the wishlist cannot be persisted.
    pub fn clear(&mut self) -> Result<(), WishlistError> {
        self.products.clear();

        self.persist()
    }

    /// Add `product` if absent, remove it otherwise. Returns whether it is now saved.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`WishlistError::Store`] when the wishlist cannot be persisted.
    pub fn toggle(&mut self, product: &Product) -> Result<bool, WishlistError> {
        if self.contains(&product.id) {
            self.remove(&product.id)?;

            Ok(false)
        } else {
            self.add(product)?;

            Ok(true)
        }
    }

    /// Whether `product_id` is saved.
    pub fn contains(&self, product_id: &str) -> bool {
        self.products.iter().any(|product| product.id == product_id)
    }

    /// Saved products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of saved products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// `true` when nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn persist(&self) -> Result<(), WishlistError> {
        match store::save(self.store.as_ref(), &self.key, &self.products) {
            Err(error) if self.mode.is_strict() => Err(error.into()),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Wishlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wishlist")
            .field("products", &self.products.len())
            .field("key", &self.key)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;
    use crate::store::{MemoryStore, MockKeyValueStore};

    const KEY: &str = "panda-wishlist";

    fn product(id: &str) -> Product {
        Product::new(id, id, id, Decimal::ONE)
    }

    #[test]
    fn add_ignores_duplicates() -> TestResult {
        let mut wishlist = Wishlist::new(Arc::new(MemoryStore::new()), KEY, ValidationMode::Lenient);

        wishlist.add(&product("1"))?;
        wishlist.add(&product("2"))?;
        wishlist.add(&product("1"))?;

        let ids: Vec<_> = wishlist.products().iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["1", "2"]);

        Ok(())
    }

    #[test]
    fn toggle_flips_membership() -> TestResult {
        let mut wishlist = Wishlist::new(Arc::new(MemoryStore::new()), KEY, ValidationMode::Lenient);
        let tea = product("tea");

        assert!(wishlist.toggle(&tea)?);
        assert!(wishlist.contains("tea"));
        assert!(!wishlist.toggle(&tea)?);
        assert!(wishlist.is_empty());

        Ok(())
    }

    #[test]
    fn remove_and_clear() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let mut wishlist = Wishlist::new(store.clone(), KEY, ValidationMode::Lenient);

        wishlist.add(&product("1"))?;
        wishlist.add(&product("2"))?;
        wishlist.remove("1")?;
        wishlist.remove("missing")?;

        assert_eq!(wishlist.len(), 1);

        wishlist.clear()?;

        assert!(wishlist.is_empty());
        assert_eq!(store.get(KEY), Some(json!([])));

        Ok(())
    }

    #[test]
    fn reload_restores_and_dedupes() {
        let store = Arc::new(MemoryStore::new().with_entry(
            KEY,
            json!([
                { "id": "1", "name": "خبز", "price": 2.5 },
                { "id": "1", "name": "خبز", "price": 2.5 },
                { "id": "4", "name": "فلفل", "price": 12 }
            ]),
        ));

        let wishlist = Wishlist::load(store, KEY, ValidationMode::Lenient);

        assert_eq!(wishlist.len(), 2);
        assert!(wishlist.contains("4"));
    }

    #[test]
    fn malformed_blob_starts_empty() {
        let store = Arc::new(MemoryStore::new().with_entry(KEY, json!({ "not": "a list" })));

        let wishlist = Wishlist::load(store.clone(), KEY, ValidationMode::Lenient);

        assert!(wishlist.is_empty());
        assert!(store.get(KEY).is_none());
    }

    #[test]
    fn strict_surfaces_write_failures() {
        let mut store = MockKeyValueStore::new();

        store
            .expect_write()
            .returning(|key, _| Err(StoreError::InvalidKey(key.to_string())));

        let mut wishlist = Wishlist::new(Arc::new(store), KEY, ValidationMode::Strict);

        assert!(matches!(
            wishlist.add(&product("1")),
            Err(WishlistError::Store(_))
        ));
        assert!(wishlist.contains("1"));
    }
}
