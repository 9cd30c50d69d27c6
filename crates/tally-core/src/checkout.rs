//! # Checkout Orchestrator
//!
//! The single-pass transaction over a (Customer, Cart) pair.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Phases                               │
//! │                                                                     │
//! │  1. Precondition ──► empty cart aborts immediately                  │
//! │                                                                     │
//! │  2. Validation ────► per line, insertion order, READ-ONLY:          │
//! │     │                quantity > 0, product exists, not expired,     │
//! │     │                live stock covers the line                     │
//! │     │                accumulate subtotal + shipping fee,            │
//! │     │                collect shipment items                         │
//! │     ▼                                                               │
//! │  3. Affordability ─► total = subtotal + fee; must fit the balance   │
//! │                                                                     │
//! │  4. Commit ────────► deduct every line's stock, then the balance    │
//! │                      (compensating rollback if anything fails)      │
//! │                                                                     │
//! │  5. Outcome ───────► CheckoutOutcome; rendering is the caller's     │
//! │                      concern (render_receipt / render_manifest)     │
//! │                                                                     │
//! │  Any failure in 1-3 happens before the first mutation.              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! `checkout` holds `&mut Catalog` and `&mut Customer`, so the borrow
//! checker makes the whole call one critical section: no other actor can
//! observe or move stock between the validation pass and the commit.
//! Callers that share state across threads wrap it in a lock and keep the
//! guard for the duration of the call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::customer::Customer;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::shipping::ShipmentItem;
use crate::validation::validate_quantity;
use crate::DEFAULT_SHIPPING_FEE_PER_UNIT;

// =============================================================================
// Store Configuration
// =============================================================================

/// Store-level settings read by the checkout.
///
/// ## Fields
/// Defaults suit development; a real deployment constructs its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Store name (for logs and outer surfaces; the receipt format itself
    /// is fixed).
    pub store_name: String,

    /// Currency code (ISO 4217). Informational: money stays in minor units.
    pub currency_code: String,

    /// Flat shipping fee charged per shipped unit.
    pub shipping_fee_per_unit: Money,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            store_name: "Tally Dev Store".to_string(),
            currency_code: "USD".to_string(),
            shipping_fee_per_unit: DEFAULT_SHIPPING_FEE_PER_UNIT,
        }
    }
}

// =============================================================================
// Checkout Outcome
// =============================================================================

/// One receipt line, frozen from the cart line it was priced from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Everything a completed checkout produced. All fields are derived; the
/// durable effects (stock and balance movement) already happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    /// One line per cart line, first-add order.
    pub lines: Vec<ReceiptLine>,

    /// Sum of line totals.
    pub subtotal: Money,

    /// Flat per-unit fee over the shippable lines.
    pub shipping_fee: Money,

    /// subtotal + shipping_fee; the amount deducted from the customer.
    pub total: Money,

    /// Customer balance after the deduction.
    pub balance_after: Money,

    /// Quantity-aggregated shippable items, first-seen order. Empty when
    /// nothing in the cart was shippable.
    pub shipped: Vec<ShipmentItem>,
}

// =============================================================================
// Checkout
// =============================================================================

/// Runs the checkout transaction.
///
/// Validates the cart against live catalog state and the customer balance,
/// then commits stock and balance deductions all-or-nothing. `as_of` is the
/// date perishables are checked against; the core never reads the clock.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use tally_core::{checkout, Cart, Catalog, Customer, Money, Product, StoreConfig};
///
/// let mut catalog = Catalog::new();
/// catalog
///     .add(Product::new("SCRATCH", "Scratch Card", Money::from_minor(100), 50).unwrap())
///     .unwrap();
///
/// let mut sara = Customer::new("Sara", Money::from_minor(20000)).unwrap();
///
/// let mut cart = Cart::new();
/// cart.add(catalog.get("SCRATCH").unwrap(), 10).unwrap();
///
/// let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
/// let outcome = checkout(&mut catalog, &mut sara, &cart, &StoreConfig::default(), today).unwrap();
///
/// assert_eq!(outcome.total.minor(), 1000);
/// assert_eq!(sara.balance().minor(), 19000);
/// ```
pub fn checkout(
    catalog: &mut Catalog,
    customer: &mut Customer,
    cart: &Cart,
    config: &StoreConfig,
    as_of: NaiveDate,
) -> CoreResult<CheckoutOutcome> {
    debug!(customer = %customer.name(), lines = cart.item_count(), "checkout started");

    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    // Validation pass: read-only, insertion order. Nothing below may mutate
    // state until every line has passed.
    let mut subtotal = Money::zero();
    let mut shipping_fee = Money::zero();
    let mut lines = Vec::with_capacity(cart.item_count());
    let mut shipped: Vec<ShipmentItem> = Vec::new();

    for line in cart.lines() {
        // Cart lines are externally mutable, so the add-time guarantee is
        // re-checked here.
        validate_quantity(line.quantity)?;

        let product = catalog
            .get(&line.sku)
            .ok_or_else(|| CoreError::ProductNotFound(line.sku.clone()))?;

        product.check_validity(as_of)?;

        // Live stock, not the stock observed at add time.
        if line.quantity > product.quantity_on_hand() {
            return Err(CoreError::InsufficientStock {
                sku: line.sku.clone(),
                available: product.quantity_on_hand(),
                requested: line.quantity,
            });
        }

        subtotal += line.line_total();

        if let Some(weight_kg) = product.weight_kg() {
            shipping_fee += config.shipping_fee_per_unit.multiply_quantity(line.quantity);
            shipped.push(ShipmentItem {
                sku: line.sku.clone(),
                name: product.name().to_string(),
                weight_kg,
                quantity: line.quantity,
            });
        }

        lines.push(ReceiptLine {
            sku: line.sku.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total(),
        });
    }

    // Affordability: still read-only.
    let total = subtotal + shipping_fee;
    if total > customer.balance() {
        return Err(CoreError::InsufficientBalance {
            required: total,
            available: customer.balance(),
        });
    }

    debug!(subtotal = %subtotal, shipping_fee = %shipping_fee, total = %total, "cart validated");

    // Commit. Validation already passed under this same exclusive borrow,
    // so neither deduction can fail; the rollback paths keep the
    // all-or-nothing guarantee from resting on that reasoning alone.
    let committed = commit_stock(catalog, cart)?;
    if let Err(err) = customer.deduct_balance(total) {
        roll_back(catalog, &committed);
        return Err(err);
    }

    info!(
        customer = %customer.name(),
        total = %total,
        lines = lines.len(),
        shipped = shipped.len(),
        "Checkout completed"
    );

    Ok(CheckoutOutcome {
        lines,
        subtotal,
        shipping_fee,
        total,
        balance_after: customer.balance(),
        shipped,
    })
}

/// Deducts every cart line's quantity from its product.
///
/// Returns the (sku, quantity) pairs actually deducted. On any failure the
/// already-deducted lines are restocked before the error is returned, so the
/// catalog is left exactly as it was.
fn commit_stock(catalog: &mut Catalog, cart: &Cart) -> CoreResult<Vec<(String, i64)>> {
    let mut committed: Vec<(String, i64)> = Vec::with_capacity(cart.item_count());

    for line in cart.lines() {
        let result = catalog
            .get_mut(&line.sku)
            .ok_or_else(|| CoreError::ProductNotFound(line.sku.clone()))
            .and_then(|product| product.deduct(line.quantity));

        match result {
            Ok(()) => committed.push((line.sku.clone(), line.quantity)),
            Err(err) => {
                roll_back(catalog, &committed);
                return Err(err);
            }
        }
    }

    Ok(committed)
}

/// Returns deducted stock to the catalog.
fn roll_back(catalog: &mut Catalog, committed: &[(String, i64)]) {
    for (sku, quantity) in committed {
        if let Some(product) = catalog.get_mut(sku) {
            // Restocking a just-deducted positive quantity cannot fail.
            let _ = product.restock(*quantity);
        }
    }
}

// =============================================================================
// Receipt Rendering
// =============================================================================

/// Renders the fixed-format checkout receipt.
///
/// ```text
/// ** Checkout receipt **
/// 2x Cheese     600
/// 1x Biscuits   200
/// ----------------------
/// Subtotal         800
/// Shipping         30
/// Amount           830
///
/// Customer balance: 19170
/// ```
pub fn render_receipt(outcome: &CheckoutOutcome) -> String {
    let mut lines = Vec::with_capacity(outcome.lines.len() + 7);
    lines.push("** Checkout receipt **".to_string());

    for line in &outcome.lines {
        lines.push(format!(
            "{}x {:<10} {}",
            line.quantity, line.name, line.line_total
        ));
    }

    lines.push("-".repeat(22));
    lines.push(format!("{:<17}{}", "Subtotal", outcome.subtotal));
    lines.push(format!("{:<17}{}", "Shipping", outcome.shipping_fee));
    lines.push(format!("{:<17}{}", "Amount", outcome.total));
    lines.push(String::new());
    lines.push(format!("Customer balance: {}", outcome.balance_after));
    lines.join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;
    use crate::shipping::render_manifest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// The reference catalog: Cheese and Biscuits are perishable and
    /// shippable, the Scratch Card is neither.
    fn reference_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add(
                Product::new("CHEESE", "Cheese", Money::from_minor(300), 70)
                    .unwrap()
                    .with_expiration(date(2028, 12, 31))
                    .with_weight_kg(0.5)
                    .unwrap(),
            )
            .unwrap();
        catalog
            .add(
                Product::new("BISCUITS", "Biscuits", Money::from_minor(200), 50)
                    .unwrap()
                    .with_expiration(date(2026, 1, 15))
                    .with_weight_kg(0.1)
                    .unwrap(),
            )
            .unwrap();
        catalog
            .add(Product::new("SCRATCH", "Scratch Card", Money::from_minor(100), 50).unwrap())
            .unwrap();
        catalog
    }

    fn sara() -> Customer {
        Customer::new("Sara", Money::from_minor(20000)).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 7, 1)
    }

    #[test]
    fn test_reference_scenario() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();
        cart.add(catalog.get("BISCUITS").unwrap(), 1).unwrap();

        let outcome = checkout(
            &mut catalog,
            &mut sara,
            &cart,
            &StoreConfig::default(),
            today(),
        )
        .unwrap();

        assert_eq!(outcome.subtotal.minor(), 800);
        assert_eq!(outcome.shipping_fee.minor(), 30);
        assert_eq!(outcome.total.minor(), 830);
        assert_eq!(outcome.balance_after.minor(), 19170);

        assert_eq!(sara.balance().minor(), 19170);
        assert_eq!(catalog.get("CHEESE").unwrap().quantity_on_hand(), 68);
        assert_eq!(catalog.get("BISCUITS").unwrap().quantity_on_hand(), 49);

        assert_eq!(outcome.shipped.len(), 2);
        assert_eq!(outcome.shipped[0].quantity, 2);
        assert_eq!(outcome.shipped[1].quantity, 1);
    }

    #[test]
    fn test_reference_scenario_reports() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();
        cart.add(catalog.get("BISCUITS").unwrap(), 1).unwrap();

        let outcome = checkout(
            &mut catalog,
            &mut sara,
            &cart,
            &StoreConfig::default(),
            today(),
        )
        .unwrap();

        let expected_manifest = "\
** Shipment notice **
2x Cheese          500g
1x Biscuits        100g
Total package weight 1.1kg";
        assert_eq!(render_manifest(&outcome.shipped), expected_manifest);

        let expected_receipt = "\
** Checkout receipt **
2x Cheese     600
1x Biscuits   200
----------------------
Subtotal         800
Shipping         30
Amount           830

Customer balance: 19170";
        assert_eq!(render_receipt(&outcome), expected_receipt);
    }

    #[test]
    fn test_empty_cart_fails_without_mutation() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let err = checkout(
            &mut catalog,
            &mut sara,
            &Cart::new(),
            &StoreConfig::default(),
            today(),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::EmptyCart));
        assert_eq!(sara.balance().minor(), 20000);
        assert_eq!(catalog.get("CHEESE").unwrap().quantity_on_hand(), 70);
    }

    #[test]
    fn test_expired_product_aborts_whole_cart() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();
        cart.add(catalog.get("BISCUITS").unwrap(), 1).unwrap();

        // Biscuits expired on 2026-01-15; the day after is too late, and the
        // valid Cheese line before it must not be deducted either.
        let err = checkout(
            &mut catalog,
            &mut sara,
            &cart,
            &StoreConfig::default(),
            date(2026, 1, 16),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::Expired { .. }));
        assert_eq!(catalog.get("CHEESE").unwrap().quantity_on_hand(), 70);
        assert_eq!(catalog.get("BISCUITS").unwrap().quantity_on_hand(), 50);
        assert_eq!(sara.balance().minor(), 20000);
    }

    #[test]
    fn test_insufficient_balance_leaves_state_unchanged() {
        let mut catalog = reference_catalog();
        let mut poor = Customer::new("Ziad", Money::from_minor(500)).unwrap();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();
        cart.add(catalog.get("BISCUITS").unwrap(), 1).unwrap();

        let err = checkout(
            &mut catalog,
            &mut poor,
            &cart,
            &StoreConfig::default(),
            today(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientBalance { .. }
        ));
        assert_eq!(poor.balance().minor(), 500);
        assert_eq!(catalog.get("CHEESE").unwrap().quantity_on_hand(), 70);
        assert_eq!(catalog.get("BISCUITS").unwrap().quantity_on_hand(), 50);
    }

    #[test]
    fn test_stock_revalidated_against_live_quantity() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();

        // Stock moves after the add; checkout must see the live value.
        catalog.get_mut("CHEESE").unwrap().deduct(69).unwrap();

        let err = checkout(
            &mut catalog,
            &mut sara,
            &cart,
            &StoreConfig::default(),
            today(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            }
        ));
        assert_eq!(catalog.get("CHEESE").unwrap().quantity_on_hand(), 1);
        assert_eq!(sara.balance().minor(), 20000);
    }

    #[test]
    fn test_vanished_product_fails_checkout() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();

        let mut empty_catalog = Catalog::new();
        let err = checkout(
            &mut empty_catalog,
            &mut sara,
            &cart,
            &StoreConfig::default(),
            today(),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::ProductNotFound(_)));
        assert_eq!(sara.balance().minor(), 20000);
    }

    #[test]
    fn test_non_shippable_cart_has_no_fee_and_no_shipment() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let mut cart = Cart::new();
        cart.add(catalog.get("SCRATCH").unwrap(), 10).unwrap();

        let outcome = checkout(
            &mut catalog,
            &mut sara,
            &cart,
            &StoreConfig::default(),
            today(),
        )
        .unwrap();

        assert_eq!(outcome.subtotal.minor(), 1000);
        assert!(outcome.shipping_fee.is_zero());
        assert!(outcome.shipped.is_empty());
        assert_eq!(outcome.total.minor(), 1000);
    }

    #[test]
    fn test_shipping_fee_rate_comes_from_config() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();

        let config = StoreConfig {
            shipping_fee_per_unit: Money::from_minor(25),
            ..StoreConfig::default()
        };

        let outcome = checkout(&mut catalog, &mut sara, &cart, &config, today()).unwrap();
        assert_eq!(outcome.shipping_fee.minor(), 50);
    }

    #[test]
    fn test_commit_rollback_restores_deducted_stock() {
        let mut catalog = reference_catalog();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();
        cart.add(catalog.get("BISCUITS").unwrap(), 50).unwrap();

        // Reach the commit helper with a cart that no longer fits the
        // stock, as a hostile caller could. The first line deducts, the
        // second fails, and the first must be restocked.
        catalog.get_mut("BISCUITS").unwrap().deduct(1).unwrap();

        let err = commit_stock(&mut catalog, &cart).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(catalog.get("CHEESE").unwrap().quantity_on_hand(), 70);
        assert_eq!(catalog.get("BISCUITS").unwrap().quantity_on_hand(), 49);
    }

    #[test]
    fn test_outcome_serializes_to_json() {
        let mut catalog = reference_catalog();
        let mut sara = sara();

        let mut cart = Cart::new();
        cart.add(catalog.get("CHEESE").unwrap(), 2).unwrap();

        let outcome = checkout(
            &mut catalog,
            &mut sara,
            &cart,
            &StoreConfig::default(),
            today(),
        )
        .unwrap();

        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"shippingFee\":20"));

        let parsed: CheckoutOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total, outcome.total);
        assert_eq!(parsed.lines.len(), 1);
    }
}
