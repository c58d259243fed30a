//! Product catalog
//!
//! Read-only lookup the engines consult when a caller only knows a product id.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::products::Product;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share an id
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),

    /// A price field is negative
    #[error("product {0} has a negative price")]
    NegativePrice(String),
}

/// Product lookup.
pub trait Catalog: Send + Sync {
    /// Product with the given id, if listed.
    fn product(&self, id: &str) -> Option<Product>;

    /// All listed products in catalog order.
    fn products(&self) -> Vec<Product>;
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<Product>,
}

/// Catalog held in memory, in listing order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    index: FxHashMap<String, usize>,
}

impl InMemoryCatalog {
    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if two products share an id or a price is negative.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for product in products {
            let negative = product.price < Decimal::ZERO
                || product
                    .compare_at_price
                    .is_some_and(|compare_at| compare_at < Decimal::ZERO);

            if negative {
                return Err(CatalogError::NegativePrice(product.id));
            }

            if catalog.index.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }

            catalog
                .index
                .insert(product.id.clone(), catalog.products.len());
            catalog.products.push(product);
        }

        Ok(catalog)
    }

    /// Parse a YAML catalog with a top-level `products` list.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is invalid or the products fail validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        Self::new(fixture.products)
    }

    /// Load a YAML catalog file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Products in a category, in catalog order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| product.category == category)
    }

    /// Borrow a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn product(&self, id: &str) -> Option<Product> {
        self.get(id).cloned()
    }

    fn products(&self) -> Vec<Product> {
        self.products.clone()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const YAML: &str = r#"
products:
  - id: "1"
    name: خبز أبيض
    nameEn: White Bread
    price: 2.50
    category: bakery
    unit: loaf
    stock: 50
  - id: "4"
    name: فلفل أسود
    nameEn: Black Pepper
    price: 4.50
    compareAtPrice: 5.25
    category: spices
"#;

    #[test]
    fn parses_yaml_fixture() -> TestResult {
        let catalog = InMemoryCatalog::from_yaml_str(YAML)?;

        assert_eq!(catalog.len(), 2);

        let pepper = catalog.product("4").ok_or("pepper missing")?;

        assert_eq!(pepper.name_en, "Black Pepper");
        assert_eq!(pepper.price, Decimal::new(450, 2));
        assert_eq!(pepper.compare_at_price, Some(Decimal::new(525, 2)));
        assert_eq!(pepper.stock, None);

        Ok(())
    }

    #[test]
    fn unknown_id_is_none() -> TestResult {
        let catalog = InMemoryCatalog::from_yaml_str(YAML)?;

        assert!(catalog.product("999").is_none());

        Ok(())
    }

    #[test]
    fn filters_by_category() -> TestResult {
        let catalog = InMemoryCatalog::from_yaml_str(YAML)?;

        let bakery: Vec<_> = catalog.in_category("bakery").map(|p| p.id.as_str()).collect();

        assert_eq!(bakery, ["1"]);

        Ok(())
    }

    #[test]
    fn rejects_duplicate_ids() {
        let product = Product::new("1", "خبز", "Bread", Decimal::ONE);

        let result = InMemoryCatalog::new([product.clone(), product]);

        assert!(
            matches!(result, Err(CatalogError::DuplicateProduct(ref id)) if id == "1"),
            "expected DuplicateProduct, got {result:?}"
        );
    }

    #[test]
    fn rejects_negative_prices() {
        let product = Product::new("1", "خبز", "Bread", Decimal::NEGATIVE_ONE);

        let result = InMemoryCatalog::new([product]);

        assert!(
            matches!(result, Err(CatalogError::NegativePrice(_))),
            "expected NegativePrice, got {result:?}"
        );
    }

    #[test]
    fn bundled_fixture_loads() -> TestResult {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/products/grocery.yml");

        let catalog = InMemoryCatalog::from_yaml_file(path)?;

        assert!(!catalog.is_empty());

        Ok(())
    }
}
