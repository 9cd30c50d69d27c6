//! # Product Model
//!
//! Catalog items with optional perishable and shippable capabilities.
//!
//! ## Capability Flattening
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  One Product record, two independent capabilities                   │
//! │                                                                     │
//! │  expires_on: Option<NaiveDate> ──► Some(_) = perishable             │
//! │  weight_kg:  Option<f64>       ──► Some(_) = shippable              │
//! │                                                                     │
//! │  A subclass lattice (Product × Expirable × Shippable) collapses     │
//! │  into two option fields; every combination is expressible and no    │
//! │  downcasting is ever needed.                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is the only mutable field. `deduct` and `restock` guard the
//! never-negative invariant; a rejected call leaves the quantity untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_amount, validate_name, validate_sku, validate_weight_kg};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Fields are private: `sku`, `name`, and `unit_price` are immutable after
/// construction, and `quantity_on_hand` only moves through the guarded
/// `deduct`/`restock` mutators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Stock Keeping Unit - the business identity used as the catalog and
    /// cart key.
    sku: String,

    /// Display name shown on the receipt and the shipment manifest.
    name: String,

    /// Unit price in minor currency units.
    unit_price: Money,

    /// Current stock level. Never negative.
    quantity_on_hand: i64,

    /// Expiration date. `Some` makes the product perishable.
    expires_on: Option<NaiveDate>,

    /// Physical weight in kilograms. `Some` makes the product shippable.
    weight_kg: Option<f64>,
}

impl Product {
    /// Creates a non-perishable, non-shippable product.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::product::Product;
    ///
    /// let card = Product::new("SCRATCH", "Scratch Card", Money::from_minor(100), 50).unwrap();
    /// assert_eq!(card.quantity_on_hand(), 50);
    /// assert!(!card.is_perishable());
    /// assert!(!card.is_shippable());
    /// ```
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity_on_hand: i64,
    ) -> CoreResult<Self> {
        let sku: String = sku.into();
        let sku = sku.trim().to_string();
        let name: String = name.into();
        let name = name.trim().to_string();

        validate_sku(&sku)?;
        validate_name(&name)?;
        validate_amount("unit_price", unit_price)?;

        if quantity_on_hand < 0 {
            return Err(ValidationError::OutOfRange {
                field: "quantity_on_hand".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        Ok(Product {
            sku,
            name,
            unit_price,
            quantity_on_hand,
            expires_on: None,
            weight_kg: None,
        })
    }

    /// Builder: marks the product perishable with the given expiration date.
    pub fn with_expiration(mut self, expires_on: NaiveDate) -> Self {
        self.expires_on = Some(expires_on);
        self
    }

    /// Builder: marks the product shippable with the given weight.
    ///
    /// Fails if the weight is not a positive finite number.
    pub fn with_weight_kg(mut self, weight_kg: f64) -> CoreResult<Self> {
        validate_weight_kg(weight_kg)?;
        self.weight_kg = Some(weight_kg);
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The product's business identity.
    #[inline]
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Current stock level.
    #[inline]
    pub fn quantity_on_hand(&self) -> i64 {
        self.quantity_on_hand
    }

    /// Expiration date, if the product is perishable.
    #[inline]
    pub fn expires_on(&self) -> Option<NaiveDate> {
        self.expires_on
    }

    /// Weight in kilograms, if the product is shippable.
    #[inline]
    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_kg
    }

    /// Whether the product carries an expiration date.
    #[inline]
    pub fn is_perishable(&self) -> bool {
        self.expires_on.is_some()
    }

    /// Whether the product has a physical weight and participates in the
    /// shipment manifest.
    #[inline]
    pub fn is_shippable(&self) -> bool {
        self.weight_kg.is_some()
    }

    // -------------------------------------------------------------------------
    // Guarded Mutators
    // -------------------------------------------------------------------------

    /// Deducts stock atomically.
    ///
    /// Fails with `InsufficientStock` if `amount` exceeds the current stock;
    /// the quantity is untouched on any failure.
    pub fn deduct(&mut self, amount: i64) -> CoreResult<()> {
        if amount <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "amount".to_string(),
            }
            .into());
        }

        if amount > self.quantity_on_hand {
            return Err(CoreError::InsufficientStock {
                sku: self.sku.clone(),
                available: self.quantity_on_hand,
                requested: amount,
            });
        }

        self.quantity_on_hand -= amount;
        Ok(())
    }

    /// Returns stock to the shelf.
    ///
    /// Used by inventory corrections and by the checkout rollback path.
    pub fn restock(&mut self, amount: i64) -> CoreResult<()> {
        if amount <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "amount".to_string(),
            }
            .into());
        }

        self.quantity_on_hand += amount;
        Ok(())
    }

    /// Checks that the product is sellable on the given date.
    ///
    /// No-op for non-perishables. For perishables, fails with `Expired` once
    /// `as_of` is strictly after the expiration date: the product is still
    /// valid *on* its expiration date. Side-effect-free and callable any
    /// number of times.
    pub fn check_validity(&self, as_of: NaiveDate) -> CoreResult<()> {
        match self.expires_on {
            Some(expired_on) if as_of > expired_on => Err(CoreError::Expired {
                sku: self.sku.clone(),
                expired_on,
            }),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
