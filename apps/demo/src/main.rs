//! # Tally Demo
//!
//! The reference checkout run: seed a small catalog, fill Sara's cart, run
//! the checkout, and print the shipment manifest and receipt.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Seed the catalog and the customer
//! 3. Fill the cart (2x Cheese + 1x Biscuits)
//! 4. Run checkout with today's date
//! 5. Print the manifest (if anything ships) and the receipt
//!
//! Expiration dates are seeded relative to the run date so the demo stays
//! valid no matter when it is executed; the checkout math matches the
//! reference scenario (subtotal 800, shipping 30, total 830).

use chrono::{Months, NaiveDate, Utc};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tally_core::{
    checkout, render_manifest, render_receipt, Cart, Catalog, CoreError, CoreResult, Customer,
    Money, Product, StoreConfig,
};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("Checkout failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> CoreResult<()> {
    let config = StoreConfig::default();
    info!(store = %config.store_name, currency = %config.currency_code, "store configured");

    let today = Utc::now().date_naive();
    let mut catalog = seed_catalog(today)?;
    let mut sara = Customer::new("Sara", Money::from_minor(20000))?;

    let mut cart = Cart::new();
    cart.add(product(&catalog, "CHEESE")?, 2)?;
    cart.add(product(&catalog, "BISCUITS")?, 1)?;

    let outcome = checkout(&mut catalog, &mut sara, &cart, &config, today)?;

    debug!(
        payload = %serde_json::to_string(&outcome).unwrap_or_default(),
        "checkout outcome"
    );

    if !outcome.shipped.is_empty() {
        println!("{}", render_manifest(&outcome.shipped));
        println!();
    }
    println!("{}", render_receipt(&outcome));

    Ok(())
}

/// Seeds the reference catalog.
///
/// Perishables get expiration dates relative to `today`; prices, stock, and
/// weights are the reference values.
fn seed_catalog(today: NaiveDate) -> CoreResult<Catalog> {
    let mut catalog = Catalog::new();

    catalog.add(
        Product::new("CHEESE", "Cheese", Money::from_minor(300), 70)?
            .with_expiration(today + Months::new(30))
            .with_weight_kg(0.5)?,
    )?;
    catalog.add(
        Product::new("BISCUITS", "Biscuits", Money::from_minor(200), 50)?
            .with_expiration(today + Months::new(6))
            .with_weight_kg(0.1)?,
    )?;
    catalog.add(Product::new("TV", "TV", Money::from_minor(2000), 1)?.with_weight_kg(10.0)?)?;
    catalog.add(Product::new(
        "SCRATCH",
        "Scratch Card",
        Money::from_minor(100),
        50,
    )?)?;

    info!(products = catalog.len(), "catalog seeded");
    Ok(catalog)
}

/// Resolves a seeded SKU, propagating a typed error instead of panicking.
fn product<'a>(catalog: &'a Catalog, sku: &str) -> CoreResult<&'a Product> {
    catalog
        .get(sku)
        .ok_or_else(|| CoreError::ProductNotFound(sku.to_string()))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - show debug messages (including the outcome payload)
/// - Default: INFO, DEBUG for the tally crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally_core=debug,tally_demo=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
