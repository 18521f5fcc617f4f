//! # Seed Data Generator
//!
//! Populates the database with a development catalog.
//!
//! ## Usage
//! ```bash
//! # 200 products (default) into STORE_DATABASE_PATH or ./storefront.db
//! cargo run -p storefront-orders --bin seed
//!
//! # Custom amount and path
//! cargo run -p storefront-orders --bin seed -- --count 50 --db ./data/dev.db
//! ```
//!
//! Products get a SKU of `{CATEGORY}-{INDEX}`, a price between $0.99 and
//! $49.99, and stock between 0 and 100. Values are derived from the index,
//! so two runs against empty databases produce the same catalog.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use storefront_db::migrations::migration_status;
use storefront_db::NewProduct;
use storefront_orders::telemetry::init_tracing;
use storefront_orders::{StoreConfig, Storefront};
use tracing::{info, warn};

const CATEGORIES: &[(&str, &[&str])] = &[
    ("KIT", &["Mug", "Teapot", "Cutting Board", "Chef Knife", "Colander"]),
    ("OFF", &["Notebook", "Fountain Pen", "Desk Lamp", "Stapler", "Monitor Stand"]),
    ("OUT", &["Water Bottle", "Camping Stove", "Headlamp", "Trail Map", "Tent Stakes"]),
    ("HOM", &["Throw Blanket", "Candle", "Picture Frame", "Doormat", "Plant Pot"]),
];

const DEFAULT_COUNT: usize = 200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = StoreConfig::load().context("loading configuration")?;
    let mut count = DEFAULT_COUNT;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--count" | "-c" => {
                let value = args.next().context("--count needs a value")?;
                count = value.parse().with_context(|| format!("invalid count: {value}"))?;
            }
            "--db" | "-d" => {
                let value = args.next().context("--db needs a value")?;
                config.database_path = PathBuf::from(value);
            }
            "--help" | "-h" => {
                println!("Usage: seed [--count N] [--db PATH]");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    init_tracing(&config.log_filter);
    info!(path = %config.database_path.display(), count, "Seeding catalog");

    let store = Storefront::connect(&config).await?;
    let products = store.database().products();

    let existing = products.count().await?;
    if existing > 0 {
        warn!(existing, "Catalog already has products, skipping seed");
        return Ok(());
    }

    let mut inserted = 0;
    for index in 0..count {
        let product = generate_product(index);
        match products.insert(&product).await {
            Ok(_) => inserted += 1,
            Err(err) => warn!(sku = %product.sku, error = %err, "Insert failed"),
        }
    }

    let (total, applied) = migration_status(store.database().pool()).await?;
    info!(inserted, migrations_applied = applied, migrations_total = total, "Seed complete");

    store.close().await;
    Ok(())
}

/// Product number `index` of the development catalog.
fn generate_product(index: usize) -> NewProduct {
    let (category, names) = CATEGORIES[index % CATEGORIES.len()];
    let name = names[(index / CATEGORIES.len()) % names.len()];
    let series = index / (CATEGORIES.len() * names.len()) + 1;

    // Cheap deterministic spread: 99..=4999 cents, 0..=100 units.
    let mix = (index as i64).wrapping_mul(2_654_435_761) & 0x7fff_ffff;
    let price_cents = 99 + (mix % 4901);
    let stock = (mix / 4901) % 101;

    NewProduct::new(
        format!("{category}-{index:05}"),
        format!("{name} Series {series}"),
        price_cents,
        stock,
    )
}
