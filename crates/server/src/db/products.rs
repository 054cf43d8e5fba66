//! Product repository, including the filtered/sorted/paginated listing
//! behind `GET /api/products`.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, sqlite::SqliteRow};

use shopkit_core::{Category, Money, Product, ProductId, Ratings};

use super::RepositoryError;
use crate::validate::ProductFields;

/// Filter criteria for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub featured: Option<bool>,
    /// Case-insensitive substring matched against name OR description.
    pub search: Option<String>,
}

/// Sortable product columns.
///
/// This is a closed whitelist: requests naming any other field fall back to
/// the default newest-first ordering instead of reaching the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    CreatedAt,
    Stock,
}

impl SortKey {
    /// Parse a query-string sort field.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "stock" => Some(Self::Stock),
            _ => None,
        }
    }

    /// The SQL expression to order by.
    ///
    /// Prices are stored as TEXT, so they are cast for numeric ordering.
    const fn sql(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "CAST(price AS REAL)",
            Self::CreatedAt => "created_at",
            Self::Stock => "stock",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new product built from validated fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, fields: ProductFields) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let product = Product {
            id: ProductId::random(),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            image: fields.image,
            stock: fields.stock,
            ratings: Ratings::default(),
            featured: fields.featured,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO products
                (id, name, description, price, category, image, stock,
                 rating_average, rating_count, featured, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(product.category.as_str())
        .bind(&product.image)
        .bind(i64::from(product.stock))
        .bind(product.ratings.average)
        .bind(i64::from(product.ratings.count))
        .bind(product.featured)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by ID. A malformed ID simply matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(|r| map_product(&r)).transpose()
    }

    /// Replace a product's editable fields, returning the updated record.
    ///
    /// Ratings and `created_at` are preserved; `updated_at` is bumped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: &ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = ?, description = ?, price = ?, category = ?,
                image = ?, stock = ?, featured = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price.to_string())
        .bind(fields.category.as_str())
        .bind(&fields.image)
        .bind(i64::from(fields.stock))
        .bind(fields.featured)
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete a product. Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List products matching the filter, sorted and paginated.
    ///
    /// Returns the page of products and the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        sort: SortKey,
        dir: SortDir,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Product>, u64), RepositoryError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE 1=1");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::new("SELECT * FROM products WHERE 1=1");
        push_filter(&mut query, filter);
        query.push(format!(" ORDER BY {} {}", sort.sql(), dir.sql()));
        query.push(" LIMIT ");
        query.push_bind(i64::from(limit));
        query.push(" OFFSET ");
        query.push_bind(i64::from(page.saturating_sub(1)) * i64::from(limit));

        let rows = query.build().fetch_all(self.pool).await?;
        let products = rows
            .iter()
            .map(map_product)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((products, u64::try_from(total).unwrap_or(0)))
    }
}

/// Append the WHERE clauses for a [`ProductFilter`].
fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    if let Some(category) = filter.category {
        query.push(" AND category = ");
        query.push_bind(category.as_str());
    }

    if let Some(featured) = filter.featured {
        query.push(" AND featured = ");
        query.push_bind(featured);
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        query.push(" AND (LOWER(name) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR LOWER(description) LIKE ");
        query.push_bind(pattern);
        query.push(" ESCAPE '\\')");
    }
}

/// Escape LIKE metacharacters so search terms match literally.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Map a product row into the domain type.
fn map_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let price: String = row.try_get("price")?;
    let price = Money::parse(&price).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
    })?;

    let category: String = row.try_get("category")?;
    let category: Category = category.parse().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
    })?;

    let stock: i64 = row.try_get("stock")?;
    let rating_count: i64 = row.try_get("rating_count")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(Product {
        id: ProductId::new(row.try_get::<String, _>("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price,
        category,
        image: row.try_get("image")?,
        stock: u32::try_from(stock).unwrap_or(0),
        ratings: Ratings {
            average: row.try_get("rating_average")?,
            count: u32::try_from(rating_count).unwrap_or(0),
        },
        featured: row.try_get("featured")?,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
