//! Catalog product record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Money, ProductId};

/// Aggregate customer rating for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Ratings {
    /// Average rating in `[0, 5]`.
    pub average: f64,
    /// Number of ratings received.
    pub count: u32,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: Category,
    pub image: String,
    pub stock: u32,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Image used when a product is created without one.
    pub const DEFAULT_IMAGE: &'static str = "default-product.jpg";

    /// Whether the product has no stock left.
    #[must_use]
    pub const fn out_of_stock(&self) -> bool {
        self.stock == 0
    }
}

/// Pagination metadata for a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-based).
    pub current: u32,
    /// Total number of pages.
    pub pages: u32,
    /// Total number of matching records.
    pub total: u64,
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new("p-1"),
            name: "Coffee Maker".to_owned(),
            description: "Automatic drip coffee maker".to_owned(),
            price: Money::parse("79.99").unwrap(),
            category: Category::Home,
            image: Product::DEFAULT_IMAGE.to_owned(),
            stock: 20,
            ratings: Ratings::default(),
            featured: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_out_of_stock() {
        let mut product = sample();
        assert!(!product.out_of_stock());
        product.stock = 0;
        assert!(product.out_of_stock());
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["category"], "Home");
    }
}
