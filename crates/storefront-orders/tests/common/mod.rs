#![allow(dead_code)]

use std::path::PathBuf;

use storefront_core::{CatalogProduct, CreateOrderRequest, OrderLineRequest, ProductId};
use storefront_db::NewProduct;
use storefront_orders::{StoreConfig, Storefront};
use uuid::Uuid;

pub const ADDRESS: &str = "221B Baker Street, London";

/// A storefront on a fresh database, removed again on drop when file-backed.
pub struct TestStore {
    pub store: Storefront,
    file: Option<PathBuf>,
}

impl TestStore {
    /// In-memory, strict lifecycle.
    pub async fn new() -> Self {
        Self::open(StoreConfig::in_memory(), None).await
    }

    /// In-memory, any status may follow any other.
    pub async fn permissive() -> Self {
        Self::open(StoreConfig::in_memory().with_strict_status_transitions(false), None).await
    }

    /// A database file in the temp dir with a real multi-connection pool.
    pub async fn file_backed(max_connections: u32) -> Self {
        let path = std::env::temp_dir().join(format!("storefront-test-{}.db", Uuid::new_v4().simple()));
        let config = StoreConfig {
            database_path: path.clone(),
            max_connections,
            ..StoreConfig::default()
        };
        Self::open(config, Some(path)).await
    }

    async fn open(config: StoreConfig, file: Option<PathBuf>) -> Self {
        let store = Storefront::connect(&config).await.expect("open test store");
        TestStore { store, file }
    }

    pub async fn product(&self, sku: &str, price_cents: i64, stock: i64) -> CatalogProduct {
        self.store
            .database()
            .products()
            .insert(&NewProduct::new(sku, sku, price_cents, stock))
            .await
            .expect("insert product")
    }

    pub async fn stock(&self, product_id: ProductId) -> i64 {
        self.store
            .database()
            .products()
            .get_by_id(product_id)
            .await
            .expect("read product")
            .expect("product exists")
            .stock_quantity
    }
}

impl Drop for TestStore {
    fn drop(&mut self) {
        if let Some(path) = &self.file {
            for suffix in ["", "-wal", "-shm"] {
                let mut file = path.clone().into_os_string();
                file.push(suffix);
                let _ = std::fs::remove_file(file);
            }
        }
    }
}

/// A checkout request shipping and billing to [`ADDRESS`].
pub fn request(lines: &[(ProductId, i64)]) -> CreateOrderRequest {
    CreateOrderRequest {
        items: lines
            .iter()
            .map(|&(product_id, quantity)| OrderLineRequest { product_id, quantity })
            .collect(),
        shipping_address: ADDRESS.to_string(),
        billing_address: ADDRESS.to_string(),
    }
}
