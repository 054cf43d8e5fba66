//! Catalog query service.
//!
//! Normalizes raw query-string input into a safe, bounded listing request:
//! sort fields come from a whitelist, page and limit are clamped, and an
//! unknown category matches nothing rather than erroring.

use serde::Deserialize;
use sqlx::SqlitePool;

use shopkit_core::{Category, Pagination, Product, ProductId, ProductPage};

use crate::db::{ProductFilter, ProductRepository, RepositoryError, SortDir, SortKey};
use crate::validate::ProductFields;

/// Default page size for listings.
const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
const MAX_LIMIT: u32 = 100;

/// Raw `GET /api/products` query parameters, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CatalogQuery {
    /// Normalized page number, 1-based.
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Normalized page size.
    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Sort column and direction.
    ///
    /// An absent or unrecognized `sort` falls back to newest-first. The
    /// direction only applies when a sort field was given; it defaults to
    /// ascending unless `order=desc`.
    fn sort(&self) -> (SortKey, SortDir) {
        match self.sort.as_deref().and_then(SortKey::parse) {
            Some(key) => {
                let dir = if self.order.as_deref() == Some("desc") {
                    SortDir::Desc
                } else {
                    SortDir::Asc
                };
                (key, dir)
            }
            None => (SortKey::CreatedAt, SortDir::Desc),
        }
    }

    /// The filter portion of the query, if every given value is usable.
    ///
    /// Returns `None` when a category was supplied but is not a known
    /// category name; such a query can never match a product.
    fn filter(&self) -> Option<ProductFilter> {
        let category = match self.category.as_deref() {
            Some(raw) => Some(raw.parse::<Category>().ok()?),
            None => None,
        };

        Some(ProductFilter {
            category,
            featured: self.featured.as_deref().map(|s| s == "true"),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        })
    }
}

/// Read/write access to the product catalog.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// List products for a raw query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a database query fails.
    pub async fn list(&self, query: &CatalogQuery) -> Result<ProductPage, RepositoryError> {
        let page = query.page();
        let limit = query.limit();

        let Some(filter) = query.filter() else {
            // Unknown category: an empty result, not an error.
            return Ok(ProductPage {
                products: Vec::new(),
                pagination: Pagination {
                    current: page,
                    pages: 0,
                    total: 0,
                },
            });
        };

        let (sort, dir) = query.sort();
        let (products, total) = self.products.list(&filter, sort, dir, page, limit).await?;

        Ok(ProductPage {
            products,
            pagination: Pagination {
                current: page,
                pages: u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX),
                total,
            },
        })
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a database query fails.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        self.products.get(id).await
    }

    /// Create a product from validated fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn create(&self, fields: ProductFields) -> Result<Product, RepositoryError> {
        self.products.insert(fields).await
    }

    /// Update a product. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the update fails.
    pub async fn update(
        &self,
        id: &ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, RepositoryError> {
        self.products.update(id, fields).await
    }

    /// Delete a product. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails.
    pub async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        self.products.delete(id).await
    }
}
