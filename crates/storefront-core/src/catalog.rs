//! # Catalog Lookup
//!
//! The narrow interface through which the core reads product facts.
//!
//! The catalog itself is an external collaborator. Pricing and stock checks
//! run against a [`CatalogLookup`], which in production is a
//! [`CatalogSnapshot`] loaded by the database layer for the products a
//! request mentions.

use std::collections::HashMap;

use crate::types::{CatalogProduct, ProductId};

/// Resolves a product id to its current price, active flag, and stock.
pub trait CatalogLookup {
    /// Returns `None` when the id does not resolve.
    fn get_product(&self, id: ProductId) -> Option<&CatalogProduct>;
}

/// Point-in-time copy of the catalog rows a request needs.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: HashMap<ProductId, CatalogProduct>,
}

impl CatalogSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        CatalogSnapshot::default()
    }

    /// Adds or replaces a product.
    pub fn insert(&mut self, product: CatalogProduct) {
        self.products.insert(product.id, product);
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogLookup for CatalogSnapshot {
    fn get_product(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.products.get(&id)
    }
}

impl FromIterator<CatalogProduct> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = CatalogProduct>>(iter: I) -> Self {
        let mut snapshot = CatalogSnapshot::new();
        for product in iter {
            snapshot.insert(product);
        }
        snapshot
    }
}
