//! # tally-core: Pure Business Logic for Tally Checkout
//!
//! This crate is the heart of Tally Checkout. It models a minimal retail
//! flow - a catalog of perishable and shippable goods, a shopping cart, a
//! customer balance - and runs the all-or-nothing checkout over them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Tally Checkout Architecture                     │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                 apps/demo (or any caller)                     │  │
//! │  │    seeds catalog ──► fills cart ──► checkout ──► prints       │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                ★ tally-core (THIS CRATE) ★                    │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌────────┐ ┌──────────┐ ┌─────────┐ │  │
//! │  │  │  money  │ │ product │ │  cart  │ │ checkout │ │shipping │ │  │
//! │  │  │  Money  │ │ Catalog │ │CartLine│ │ Outcome  │ │Manifest │ │  │
//! │  │  └─────────┘ └─────────┘ └────────┘ └──────────┘ └─────────┘ │  │
//! │  │                                                               │  │
//! │  │  NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS              │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`product`] - Product record with perishable/shippable capabilities
//! - [`catalog`] - SKU-keyed product collection
//! - [`cart`] - Insertion-ordered, duplicate-free cart
//! - [`customer`] - Guarded customer balance
//! - [`shipping`] - Shipment manifest
//! - [`checkout`] - The checkout orchestrator
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: checkout is deterministic - the caller passes the
//!    date, the core never reads the clock
//! 2. **No I/O**: reports are returned as strings; printing is the caller's
//!    job
//! 3. **Integer Money**: all monetary values are i64 minor units
//! 4. **Explicit Errors**: all failures are typed, never strings or panics,
//!    and every pre-commit failure leaves state untouched

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod error;
pub mod money;
pub mod product;
pub mod shipping;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use cart::{Cart, CartLine};
pub use catalog::Catalog;
pub use checkout::{checkout, render_receipt, CheckoutOutcome, ReceiptLine, StoreConfig};
pub use customer::Customer;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use product::Product;
pub use shipping::{render_manifest, total_weight_kg, ShipmentItem};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps transactions reviewable at the till.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Flat shipping fee charged per shipped unit, in minor currency units.
///
/// A fixed per-unit rate was chosen over the weight-proportional variant;
/// stores override it through [`StoreConfig::shipping_fee_per_unit`].
pub const DEFAULT_SHIPPING_FEE_PER_UNIT: Money = Money::from_minor(10);
