//! # Cart
//!
//! The shopping cart: an insertion-ordered, duplicate-free collection of
//! lines keyed by SKU.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                               │
//! │                                                                     │
//! │  add(product, qty) ───────► merge into existing line, or append     │
//! │  update_quantity(sku, n) ─► replace quantity (0 removes the line)   │
//! │  remove(sku) ─────────────► drop the line (no-op when absent)       │
//! │  lines() ─────────────────► read-only view, insertion order         │
//! │                                                                     │
//! │  Adding NEVER mutates product stock: nothing is reserved, and the   │
//! │  checkout re-validates every line against live stock.               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::product::Product;
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One (product, aggregated quantity) entry in a cart.
///
/// ## Design Notes
/// - `sku`: the product reference used to resolve live stock at checkout
/// - `name`/`unit_price`: frozen at add time. Product names and prices are
///   immutable, so the frozen copy can never diverge from the catalog; it
///   exists so receipt rendering needs no catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// SKU of the referenced product.
    pub sku: String,

    /// Product name at add time (frozen).
    pub name: String,

    /// Unit price at add time (frozen).
    pub unit_price: Money,

    /// Requested quantity for purchase. Always positive.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a cart line from a product and quantity.
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            unit_price: product.unit_price(),
            quantity,
        }
    }

    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by SKU (adding the same product merges quantities)
/// - Every quantity is positive and at most `MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` distinct lines
/// - First-add insertion order is preserved for receipt rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart, merging with an existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: the quantities are summed into one line
    /// - Otherwise: a new line is appended
    ///
    /// The merged quantity must not exceed `MAX_ITEM_QUANTITY` or the
    /// product's *current* stock. Stock is checked but never deducted here;
    /// multiple carts may reference the same stock without reserving it, and
    /// checkout re-validates against live quantities.
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.sku == product.sku()) {
            let merged = line.quantity + quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: MAX_ITEM_QUANTITY,
                }
                .into());
            }
            if merged > product.quantity_on_hand() {
                return Err(CoreError::InsufficientStock {
                    sku: product.sku().to_string(),
                    available: product.quantity_on_hand(),
                    requested: merged,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        if quantity > product.quantity_on_hand() {
            return Err(CoreError::InsufficientStock {
                sku: product.sku().to_string(),
                available: product.quantity_on_hand(),
                requested: quantity,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Replaces the quantity of an existing line.
    ///
    /// ## Behavior
    /// - Quantity 0 removes the line
    /// - Unknown SKU fails with `ProductNotFound`
    ///
    /// Stock cannot be checked here (there is no product handle); checkout
    /// validates the final quantity against live stock.
    pub fn update_quantity(&mut self, sku: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            self.remove(sku);
            return Ok(());
        }

        validate_quantity(quantity)?;

        match self.lines.iter_mut().find(|l| l.sku == sku) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ProductNotFound(sku.to_string())),
        }
    }

    /// Removes the line for a SKU. No-op when the SKU is not in the cart.
    pub fn remove(&mut self, sku: &str) {
        self.lines.retain(|l| l.sku != sku);
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Read-only view of the lines, in first-add order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
