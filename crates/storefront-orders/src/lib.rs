//! # storefront-orders: Order Fulfillment Services
//!
//! Turns carts and checkout requests into durable, paid orders.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront (handle)                              │
//! │                                                                         │
//! │   StoreConfig ──► Storefront::connect() ──► Database (one pool)        │
//! │                          │                                              │
//! │        ┌─────────────────┼──────────────────┬───────────────────┐       │
//! │        ▼                 ▼                  ▼                   ▼       │
//! │   CartService ──►   Checkout ──────►   OrderLedger      PaymentProcessor│
//! │   (stock guard)     (price + build)    (create, read,   (settle +      │
//! │                                         lifecycle)       confirm)      │
//! │                                                                         │
//! │   storefront-core: pricing, stock guard, status rules (pure)            │
//! │   storefront-db:   repositories, transactions (SQLite)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every service receives the database handle at construction; nothing is
//! global. Identity is established upstream, so operations take the
//! requester id as a plain argument.
//!
//! ## Usage
//! ```rust,ignore
//! let store = Storefront::connect(&StoreConfig::load()?).await?;
//!
//! let order = store.checkout().place_order(user_id, &request).await?;
//! let payment = store.payments().process_payment(order.id, "card").await?;
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod ledger;
pub mod payment;
pub mod telemetry;

pub use cart::CartService;
pub use checkout::Checkout;
pub use config::{ConfigError, StoreConfig};
pub use error::{ErrorKind, ErrorResponse, ServiceError, ServiceResult};
pub use ledger::OrderLedger;
pub use payment::PaymentProcessor;

use storefront_core::TransitionPolicy;
use storefront_db::Database;
use tracing::info;

/// Entry point owning the database and handing out services.
#[derive(Debug, Clone)]
pub struct Storefront {
    db: Database,
    policy: TransitionPolicy,
}

impl Storefront {
    /// Opens (and migrates) the database described by `config`.
    pub async fn connect(config: &StoreConfig) -> ServiceResult<Self> {
        let db = Database::new(config.db_config()).await?;
        let policy = config.transition_policy();

        info!(path = %config.database_path.display(), ?policy, "Storefront ready");
        Ok(Storefront::from_database(db, policy))
    }

    /// Wraps an already opened database.
    pub fn from_database(db: Database, policy: TransitionPolicy) -> Self {
        Storefront { db, policy }
    }

    pub fn ledger(&self) -> OrderLedger {
        OrderLedger::new(self.db.clone(), self.policy)
    }

    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.db.clone(), self.ledger())
    }

    pub fn payments(&self) -> PaymentProcessor {
        PaymentProcessor::new(self.db.clone())
    }

    pub fn carts(&self) -> CartService {
        CartService::new(self.db.clone(), self.checkout())
    }

    /// The underlying database, for catalog fixtures and maintenance.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Whether the database answers queries.
    pub async fn health_check(&self) -> bool {
        self.db.health_check().await
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}
