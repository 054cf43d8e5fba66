//! Input validation at the service boundary.
//!
//! Validation is explicit and independent of the storage layer: each
//! endpoint's input type is deserialized leniently (missing fields become
//! defaults) and then checked here, producing structured field errors that
//! the error responder renders as a 400 with an `errors` array.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopkit_core::{Address, Category, Email, Money, OrderItem, Product, ProductId};

/// Maximum length of a user's name.
const MAX_USER_NAME: usize = 50;
/// Maximum length of a product name.
const MAX_PRODUCT_NAME: usize = 100;
/// Maximum length of a product description.
const MAX_DESCRIPTION: usize = 1000;
/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// One validation failure, tied to the offending field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Auth inputs
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Validate a registration request, returning the parsed email.
///
/// # Errors
///
/// Returns the collected field errors if any check fails.
pub fn validate_register(input: &RegisterInput) -> Result<Email, Vec<FieldError>> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if input.name.len() > MAX_USER_NAME {
        errors.push(FieldError::new(
            "name",
            format!("Name cannot exceed {MAX_USER_NAME} characters"),
        ));
    }

    let email = match Email::parse(&input.email) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push(FieldError::new("email", "Please include a valid email"));
            None
        }
    };

    if input.password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }

    match (errors.is_empty(), email) {
        (true, Some(email)) => Ok(email),
        _ => Err(errors),
    }
}

/// Validate a login request, returning the parsed email.
///
/// # Errors
///
/// Returns the collected field errors if any check fails.
pub fn validate_login(input: &LoginInput) -> Result<Email, Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = match Email::parse(&input.email) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push(FieldError::new("email", "Please include a valid email"));
            None
        }
    };

    if input.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    match (errors.is_empty(), email) {
        (true, Some(email)) => Ok(email),
        _ => Err(errors),
    }
}

// =============================================================================
// Product input
// =============================================================================

/// Product create/update request body.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub category: String,
    pub image: Option<String>,
    pub stock: Option<i64>,
    pub featured: Option<bool>,
}

/// Validated, normalized product fields ready for storage.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: Category,
    pub image: String,
    pub stock: u32,
    pub featured: bool,
}

/// Validate a product create/update request.
///
/// # Errors
///
/// Returns the collected field errors if any check fails.
pub fn validate_product(input: &ProductInput) -> Result<ProductFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Product name is required"));
    } else if input.name.len() > MAX_PRODUCT_NAME {
        errors.push(FieldError::new(
            "name",
            format!("Product name cannot exceed {MAX_PRODUCT_NAME} characters"),
        ));
    }

    if input.description.trim().is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    } else if input.description.len() > MAX_DESCRIPTION {
        errors.push(FieldError::new(
            "description",
            format!("Description cannot exceed {MAX_DESCRIPTION} characters"),
        ));
    }

    let price = match input.price {
        Some(price) if price >= Decimal::ZERO => Some(Money::from_decimal(price)),
        _ => {
            errors.push(FieldError::new("price", "Price must be a positive number"));
            None
        }
    };

    let category = match input.category.parse::<Category>() {
        Ok(category) => Some(category),
        Err(_) => {
            errors.push(FieldError::new("category", "Invalid category"));
            None
        }
    };

    let stock = match input.stock {
        Some(stock) if (0..=i64::from(u32::MAX)).contains(&stock) => {
            Some(u32::try_from(stock).unwrap_or(0))
        }
        _ => {
            errors.push(FieldError::new(
                "stock",
                "Stock must be a non-negative integer",
            ));
            None
        }
    };

    match (errors.is_empty(), price, category, stock) {
        (true, Some(price), Some(category), Some(stock)) => Ok(ProductFields {
            name: input.name.trim().to_owned(),
            description: input.description.clone(),
            price,
            category,
            image: input
                .image
                .clone()
                .unwrap_or_else(|| Product::DEFAULT_IMAGE.to_owned()),
            stock,
            featured: input.featured.unwrap_or(false),
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// Order input
// =============================================================================

/// Order creation request body.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderInput {
    pub items: Vec<OrderItemInput>,
    pub shipping_address: Option<Address>,
    pub payment_method: String,
}

/// One submitted line item.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i64,
    pub price: Option<Decimal>,
}

/// Validated order fields ready for assembly.
#[derive(Debug, Clone)]
pub struct OrderFields {
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub payment_method: String,
}

/// Validate an order creation request.
///
/// # Errors
///
/// Returns the collected field errors if any check fails.
pub fn validate_order(input: &OrderInput) -> Result<OrderFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    if input.items.is_empty() {
        errors.push(FieldError::new("items", "Order must have at least one item"));
    }

    let mut items = Vec::with_capacity(input.items.len());
    for (index, item) in input.items.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            errors.push(FieldError::new(
                format!("items[{index}].productId"),
                "Product id is required",
            ));
            continue;
        }

        if item.quantity < 1 {
            errors.push(FieldError::new(
                format!("items[{index}].quantity"),
                "Quantity must be at least 1",
            ));
            continue;
        }

        let Some(price) = item.price.filter(|p| *p >= Decimal::ZERO) else {
            errors.push(FieldError::new(
                format!("items[{index}].price"),
                "Price must be a positive number",
            ));
            continue;
        };

        items.push(OrderItem {
            product_id: ProductId::new(item.product_id.clone()),
            quantity: u32::try_from(item.quantity).unwrap_or(1),
            price: Money::from_decimal(price),
        });
    }

    if input.shipping_address.is_none() {
        errors.push(FieldError::new(
            "shippingAddress",
            "Shipping address is required",
        ));
    }

    if input.payment_method.trim().is_empty() {
        errors.push(FieldError::new(
            "paymentMethod",
            "Payment method is required",
        ));
    }

    if errors.is_empty() {
        Ok(OrderFields {
            items,
            shipping_address: input.shipping_address.clone().unwrap_or_default(),
            payment_method: input.payment_method.clone(),
        })
    } else {
        Err(errors)
    }
}
