//! Local cart store.
//!
//! The cart is a reducer over an ordered list of line items: one line per
//! product, quantity always at least 1, insertion order preserved. Every
//! mutation synchronously rewrites the whole snapshot; hydration reads the
//! last snapshot and falls back to an empty cart if it cannot be decoded.
//!
//! Quantities are not capped against stock here. Stock is advisory on the
//! client; the server is the authority at order time.

use serde::{Deserialize, Serialize};

use shopkit_core::{Money, Product, ProductId};

use crate::storage::{CART_KEY, SnapshotStore, StorageError};

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// The local cart: line items plus the snapshot store they persist to.
pub struct CartStore<S: SnapshotStore> {
    lines: Vec<CartLine>,
    store: S,
}

impl<S: SnapshotStore> CartStore<S> {
    /// Hydrate a cart from the store's last snapshot.
    ///
    /// A missing or undecodable snapshot yields an empty cart; a corrupt
    /// snapshot is logged and discarded rather than surfaced.
    pub fn load(store: S) -> Self {
        let lines = match store.get(CART_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(lines) => lines,
                Err(error) => {
                    tracing::warn!(%error, "Discarding undecodable cart snapshot");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self { lines, store }
    }

    /// Add one unit of a product.
    ///
    /// An existing line for the product gains quantity 1; otherwise a new
    /// line is appended with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot write fails; the in-memory
    /// cart is updated regardless.
    pub fn add_item(&mut self, product: &Product) -> Result<(), StorageError> {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity: 1,
            }),
        }

        self.persist()
    }

    /// Remove a product's line. Absent lines are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot write fails.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), StorageError> {
        self.lines.retain(|l| &l.product_id != product_id);
        self.persist()
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot write fails.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), StorageError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            line.quantity = quantity;
        }

        self.persist()
    }

    /// Empty the cart and drop the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot removal fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.lines.clear();
        self.store.remove(CART_KEY)
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line items in the shape the order endpoint expects.
    #[must_use]
    pub fn order_items(&self) -> Vec<shopkit_core::OrderItem> {
        self.lines
            .iter()
            .map(|l| shopkit_core::OrderItem {
                product_id: l.product_id.clone(),
                quantity: l.quantity,
                price: l.price,
            })
            .collect()
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        // Vec<CartLine> always serializes; an error here would be a bug.
        let snapshot = serde_json::to_string(&self.lines).unwrap_or_default();
        self.store.set(CART_KEY, &snapshot)
    }
}
