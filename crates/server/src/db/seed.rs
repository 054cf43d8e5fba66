//! Sample catalog data for development environments.

use sqlx::SqlitePool;

use shopkit_core::{Category, Money};

use super::{ProductRepository, RepositoryError};
use crate::validate::ProductFields;

/// Replace the catalog with the sample product set.
///
/// Existing products are removed first so seeding is repeatable.
///
/// # Errors
///
/// Returns `RepositoryError` if a statement fails.
pub async fn seed_products(pool: &SqlitePool) -> Result<usize, RepositoryError> {
    sqlx::query("DELETE FROM products").execute(pool).await?;

    let repo = ProductRepository::new(pool);
    let samples = sample_products();
    let count = samples.len();

    for fields in samples {
        repo.insert(fields).await?;
    }

    Ok(count)
}

fn product(
    name: &str,
    description: &str,
    price_cents: i64,
    category: Category,
    image: &str,
    stock: u32,
    featured: bool,
) -> ProductFields {
    ProductFields {
        name: name.to_owned(),
        description: description.to_owned(),
        price: Money::from_cents(price_cents),
        category,
        image: image.to_owned(),
        stock,
        featured,
    }
}

fn sample_products() -> Vec<ProductFields> {
    vec![
        product(
            "iPhone 15 Pro",
            "Latest Apple iPhone with A17 Pro chip and titanium design",
            99_999,
            Category::Electronics,
            "https://images.unsplash.com/photo-1695048133142-1a20484d2569?w=500",
            25,
            true,
        ),
        product(
            "Samsung Galaxy S24",
            "Advanced Android smartphone with AI features",
            84_999,
            Category::Electronics,
            "https://images.unsplash.com/photo-1610945265064-0e34e5519bbf?w=500",
            30,
            true,
        ),
        product(
            "MacBook Air M2",
            "Lightweight laptop with Apple M2 chip for ultimate performance",
            119_999,
            Category::Electronics,
            "https://images.unsplash.com/photo-1541807084-5c52b6b3adef?w=500",
            15,
            true,
        ),
        product(
            "Nike Air Max 270",
            "Comfortable running shoes with maximum air cushioning",
            12_999,
            Category::Sports,
            "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=500",
            50,
            false,
        ),
        product(
            "Levi's Jeans",
            "Classic denim jeans for everyday wear",
            5_999,
            Category::Clothing,
            "https://images.unsplash.com/photo-1542272604-787c3835535d?w=500",
            40,
            false,
        ),
        product(
            "The Great Gatsby",
            "Classic novel by F. Scott Fitzgerald",
            1_299,
            Category::Books,
            "https://images.unsplash.com/photo-1544947950-fa07a98d237f?w=500",
            100,
            false,
        ),
        product(
            "Coffee Maker",
            "Automatic drip coffee maker with programmable features",
            7_999,
            Category::Home,
            "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=500",
            20,
            true,
        ),
        product(
            "Wireless Headphones",
            "Noise-cancelling Bluetooth headphones",
            19_999,
            Category::Electronics,
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500",
            35,
            false,
        ),
    ]
}
