//! # Catalog
//!
//! The insertion-ordered product collection, keyed by SKU.
//!
//! Cart lines reference products by SKU; the catalog is what resolves those
//! references back to live products at checkout time. A `Vec` with linear
//! lookup is deliberate: this is an in-memory reference model, not an index.

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::product::Product;

/// The store's product catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog {
            products: Vec::new(),
        }
    }

    /// Adds a product, rejecting duplicate SKUs.
    pub fn add(&mut self, product: Product) -> CoreResult<()> {
        if self.get(product.sku()).is_some() {
            return Err(ValidationError::Duplicate {
                field: "sku".to_string(),
                value: product.sku().to_string(),
            }
            .into());
        }

        self.products.push(product);
        Ok(())
    }

    /// Finds a product by SKU.
    pub fn get(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku() == sku)
    }

    /// Finds a product by SKU for mutation (stock movement).
    pub fn get_mut(&mut self, sku: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.sku() == sku)
    }

    /// Iterates products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog carries no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
