//! # Shipping
//!
//! The shipment manifest: a pure report over the shippable portion of a
//! checkout.
//!
//! The checkout orchestrator collects one `ShipmentItem` per distinct
//! shippable product (quantity-aggregated, first-seen order) and hands the
//! list here. Rendering never mutates anything; it returns a `String` and
//! the caller decides where the text goes.
//!
//! ## Manifest Format
//! ```text
//! ** Shipment notice **
//! 2x Cheese          500g
//! 1x Biscuits        100g
//! Total package weight 1.1kg
//! ```
//!
//! Per line: quantity, name padded to 15 columns, and the *unit* weight in
//! grams. The trailing total is the quantity-weighted package weight in
//! kilograms, one decimal place.

use serde::{Deserialize, Serialize};

// =============================================================================
// Shipment Item
// =============================================================================

/// One distinct shippable product in a shipment, with its summed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentItem {
    /// SKU of the shipped product.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Unit weight in kilograms.
    pub weight_kg: f64,

    /// Units shipped.
    pub quantity: i64,
}

impl ShipmentItem {
    /// Unit weight in grams, rounded to the nearest integer for display.
    pub fn unit_weight_grams(&self) -> i64 {
        (self.weight_kg * 1000.0).round() as i64
    }

    /// Quantity-weighted weight contribution in kilograms.
    pub fn total_weight_kg(&self) -> f64 {
        self.weight_kg * self.quantity as f64
    }
}

/// Total package weight in kilograms across all items.
pub fn total_weight_kg(items: &[ShipmentItem]) -> f64 {
    items.iter().map(ShipmentItem::total_weight_kg).sum()
}

// =============================================================================
// Manifest Rendering
// =============================================================================

/// Renders the shipment manifest.
///
/// Defined for empty input (header plus a zero total); the checkout
/// orchestrator only renders manifests for non-empty shipments.
pub fn render_manifest(items: &[ShipmentItem]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 2);
    lines.push("** Shipment notice **".to_string());

    for item in items {
        lines.push(format!(
            "{}x {:<15} {}g",
            item.quantity,
            item.name,
            item.unit_weight_grams()
        ));
    }

    lines.push(format!("Total package weight {:.1}kg", total_weight_kg(items)));
    lines.join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================
