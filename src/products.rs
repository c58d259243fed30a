//! Products

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storefront display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Arabic, the storefront default.
    #[default]
    Ar,

    /// English.
    En,
}

/// Unrecognised locale code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown locale {0:?}, expected \"ar\" or \"en\"")]
pub struct ParseLocaleError(String);

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Locale::Ar),
            "en" => Ok(Locale::En),
            other => Err(ParseLocaleError(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        })
    }
}

/// Catalog product.
///
/// Carts, orders and the wishlist hold snapshots of this record, so a later catalog price change
/// never rewrites what a customer already saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique catalog id
    pub id: String,

    /// Arabic name
    pub name: String,

    /// English name
    #[serde(default)]
    pub name_en: String,

    /// Unit price
    pub price: Decimal,

    /// Primary image reference
    #[serde(default)]
    pub image: String,

    /// Category slug
    #[serde(default)]
    pub category: String,

    /// Brand
    #[serde(default)]
    pub brand: String,

    /// Selling unit (kg, pack, piece, ...)
    #[serde(default)]
    pub unit: String,

    /// Arabic description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// English description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,

    /// Units available; `None` means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,

    /// Price before the sale, shown struck through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Decimal>,

    /// Advertised discount percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,

    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Catalog rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,

    /// Catalog review counter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,

    /// Additional image references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Product {
    /// Create a product with the required fields; everything optional starts empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        name_en: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            name_en: name_en.into(),
            price,
            image: String::new(),
            category: String::new(),
            brand: String::new(),
            unit: String::new(),
            description: None,
            description_en: None,
            stock: None,
            compare_at_price: None,
            discount: None,
            tags: Vec::new(),
            rating: None,
            reviews: None,
            images: Vec::new(),
        }
    }

    /// Limit the product to `stock` units.
    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Set the pre-sale price.
    #[must_use]
    pub fn with_compare_at_price(mut self, compare_at_price: Decimal) -> Self {
        self.compare_at_price = Some(compare_at_price);
        self
    }

    /// Set the category slug.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Name in the requested locale, falling back to Arabic when no English name exists.
    pub fn name_in(&self, locale: Locale) -> &str {
        match locale {
            Locale::En if !self.name_en.is_empty() => &self.name_en,
            Locale::Ar | Locale::En => &self.name,
        }
    }

    /// Description in the requested locale, falling back to the other language.
    pub fn description_in(&self, locale: Locale) -> Option<&str> {
        let (preferred, fallback) = match locale {
            Locale::Ar => (&self.description, &self.description_en),
            Locale::En => (&self.description_en, &self.description),
        };

        preferred.as_deref().or(fallback.as_deref())
    }

    /// Whether quantity `quantity` would exceed the stock limit.
    pub fn exceeds_stock(&self, quantity: u32) -> bool {
        self.stock.is_some_and(|stock| quantity > stock)
    }

    /// Saving per unit against the compare-at price, zero when not on sale.
    pub fn unit_savings(&self) -> Decimal {
        match self.compare_at_price {
            Some(compare_at) if compare_at > self.price => compare_at - self.price,
            _ => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn bread() -> Product {
        Product::new("1", "خبز أبيض", "White Bread", Decimal::new(250, 2))
    }

    #[test]
    fn name_in_locale() {
        let product = bread();

        assert_eq!(product.name_in(Locale::Ar), "خبز أبيض");
        assert_eq!(product.name_in(Locale::En), "White Bread");
    }

    #[test]
    fn english_name_falls_back_to_arabic() {
        let product = Product::new("1", "خبز", "", Decimal::ONE);

        assert_eq!(product.name_in(Locale::En), "خبز");
    }

    #[test]
    fn description_falls_back_to_other_language() {
        let mut product = bread();
        product.description_en = Some("Fresh".to_string());

        assert_eq!(product.description_in(Locale::Ar), Some("Fresh"));
        assert_eq!(product.description_in(Locale::En), Some("Fresh"));
    }

    #[test]
    fn unit_savings_only_when_compare_at_is_higher() {
        let on_sale = bread().with_compare_at_price(Decimal::new(300, 2));
        let marked_up = bread().with_compare_at_price(Decimal::new(200, 2));

        assert_eq!(on_sale.unit_savings(), Decimal::new(50, 2));
        assert_eq!(marked_up.unit_savings(), Decimal::ZERO);
        assert_eq!(bread().unit_savings(), Decimal::ZERO);
    }

    #[test]
    fn exceeds_stock_respects_unlimited() {
        assert!(!bread().exceeds_stock(1_000));
        assert!(bread().with_stock(2).exceeds_stock(3));
        assert!(!bread().with_stock(2).exceeds_stock(2));
    }

    #[test]
    fn decodes_storefront_json() -> TestResult {
        let json = r#"{
            "id": "7",
            "name": "أرز بسمتي",
            "nameEn": "Basmati Rice",
            "price": 89.99,
            "image": "/rice.png",
            "category": "dry-grocery",
            "brand": "Abu Kass",
            "unit": "5kg",
            "stock": 20,
            "compareAtPrice": 99.99
        }"#;

        let product: Product = serde_json::from_str(json)?;

        assert_eq!(product.price, Decimal::new(8999, 2));
        assert_eq!(product.stock, Some(20));
        assert_eq!(product.compare_at_price, Some(Decimal::new(9999, 2)));
        assert!(product.tags.is_empty());

        Ok(())
    }

    #[test]
    fn parses_locale_codes() {
        assert_eq!("AR".parse::<Locale>(), Ok(Locale::Ar));
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }
}
