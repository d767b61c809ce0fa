//! Seeding policy for the catalog and the admin-wide order ledger.
//!
//! Seed data comes from an injected [`SeedProvider`]; the store logic never embeds
//! its own dataset. A collection is seeded only when it is missing or empty, so
//! repeated checks never reset or duplicate existing data.

use crate::{
    config::seed::{OrderSeed, SeedConfig},
    core::{
        namespace::{NamespaceKey, admin_orders_key, menu_key},
        orders::{build_order, format_order_date},
        store,
    },
    errors::{Error, Result},
    models::{CartLine, Category, MenuItem, Order, OrderStatus},
};
use chrono::{DateTime, Duration, Local};
use sea_orm::{TransactionTrait, prelude::*};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

/// Source of demo data written on first access.
pub trait SeedProvider {
    /// Catalog written when the menu is missing or empty.
    fn menu(&self) -> Vec<MenuItem>;

    /// Orders written when the admin ledger is missing or empty.
    /// `now` is the seeding time; seeded orders are dated relative to it.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when an order cannot be dated.
    fn admin_orders(&self, now: DateTime<Local>) -> Result<Vec<Order>>;
}

impl SeedProvider for SeedConfig {
    fn menu(&self) -> Vec<MenuItem> {
        self.menu.clone()
    }

    fn admin_orders(&self, now: DateTime<Local>) -> Result<Vec<Order>> {
        self.orders
            .iter()
            .zip(0_i64..)
            .map(|(seed, index)| {
                let placed_at = placed_at(now, seed.age_seconds)?;
                // Offset by position so orders placed in the same second stay unique
                let id = placed_at.timestamp_millis() - index;
                let mut order = build_order(id, &seed.customer, &seed.items, seed.status);
                order.date = format_order_date(placed_at);
                Ok(order)
            })
            .collect()
    }
}

fn placed_at(now: DateTime<Local>, age_seconds: i64) -> Result<DateTime<Local>> {
    if age_seconds < 0 {
        return Err(Error::Config {
            message: format!("seed order age_seconds must not be negative, got {age_seconds}"),
        });
    }
    Duration::try_seconds(age_seconds)
        .and_then(|age| now.checked_sub_signed(age))
        .ok_or_else(|| Error::Config {
            message: format!("seed order age_seconds out of range: {age_seconds}"),
        })
}

/// The built-in demo dataset: four dishes and two sample orders.
#[must_use]
pub fn demo_seed() -> SeedConfig {
    let dish = |id, name: &str, price, category, image: &str| MenuItem {
        id,
        name: name.to_string(),
        price,
        category,
        image: Some(image.to_string()),
        available: true,
    };
    let line = |id, name: &str, price, qty| CartLine {
        id,
        name: name.to_string(),
        price,
        qty,
    };

    SeedConfig {
        menu: vec![
            dish(1, "Burger", 8.0, Category::MainCourse, "/images/burger.jpg"),
            dish(2, "Pizza", 12.0, Category::MainCourse, "/images/pizza.jpg"),
            dish(3, "Pasta", 10.0, Category::MainCourse, "/images/pasta.jpg"),
            dish(4, "Salad", 6.0, Category::Starters, "/images/salad.jpg"),
        ],
        orders: vec![
            OrderSeed {
                customer: "laiba@gmail.com".to_string(),
                status: OrderStatus::Pending,
                age_seconds: 0,
                items: vec![
                    line(2, "Pizza", 12.0, 1),
                    line(4, "Salad", 6.0, 1),
                    line(1, "Burger", 4.0, 1),
                ],
            },
            OrderSeed {
                customer: "awais@gmail.com".to_string(),
                status: OrderStatus::Confirmed,
                age_seconds: 86_400,
                items: vec![line(1, "Burger", 9.0, 2)],
            },
        ],
    }
}

async fn seed_if_empty<C, T>(
    db: &C,
    key: &NamespaceKey,
    seed: impl FnOnce() -> Result<Vec<T>>,
) -> Result<bool>
where
    C: TransactionTrait,
    T: Serialize + DeserializeOwned,
{
    let txn = db.begin().await?;

    let existing: Option<Vec<T>> = store::load(&txn, key).await?;
    if existing.is_some_and(|records| !records.is_empty()) {
        debug!("{key} already populated; skipping seed");
        return Ok(false);
    }

    let records = seed()?;
    if records.is_empty() {
        debug!("Seed provider has nothing for {key}");
        return Ok(false);
    }

    store::replace(&txn, key, &records).await?;
    txn.commit().await?;
    info!("Seeded {key} with {} records", records.len());
    Ok(true)
}

/// Writes the provider's menu when the catalog is missing or empty.
/// Returns whether anything was written.
pub async fn ensure_catalog_seeded(
    db: &DatabaseConnection,
    seeds: &impl SeedProvider,
) -> Result<bool> {
    seed_if_empty(db, &menu_key(), || Ok(seeds.menu())).await
}

/// Writes the provider's orders when the admin ledger is missing or empty.
/// Returns whether anything was written.
pub async fn ensure_admin_orders_seeded(
    db: &DatabaseConnection,
    seeds: &impl SeedProvider,
) -> Result<bool> {
    seed_if_empty(db, &admin_orders_key(), || seeds.admin_orders(Local::now())).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_demo_seed_orders_have_recomputed_totals() {
        let orders = demo_seed().admin_orders(Local::now()).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].total, 22.0);
        assert_eq!(orders[0].status, OrderStatus::Pending);
        assert_eq!(orders[1].total, 18.0);
        assert_eq!(orders[1].status, OrderStatus::Confirmed);
        assert!(orders[1].id < orders[0].id);
        assert_ne!(orders[0].id, orders[1].id);
    }

    #[test]
    fn test_shipped_config_matches_demo_seed() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml");
        let config = crate::config::seed::load_config(path).unwrap();
        let demo = demo_seed();
        assert_eq!(config.menu, demo.menu);

        let now = Local::now();
        let from_file = config.admin_orders(now).unwrap();
        let built_in = demo.admin_orders(now).unwrap();
        assert_eq!(from_file, built_in);
    }

    #[tokio::test]
    async fn test_undatable_seed_order_is_config_error() -> Result<()> {
        let db = setup_test_db().await?;

        for age_seconds in [i64::MAX, -60] {
            let seeds = SeedConfig {
                menu: Vec::new(),
                orders: vec![OrderSeed {
                    customer: "awais@gmail.com".to_string(),
                    status: OrderStatus::Pending,
                    age_seconds,
                    items: vec![CartLine {
                        id: 1,
                        name: "Burger".to_string(),
                        price: 8.0,
                        qty: 1,
                    }],
                }],
            };
            let result = ensure_admin_orders_seeded(&db, &seeds).await;
            assert!(matches!(result, Err(Error::Config { .. })));
        }

        let orders: Option<Vec<Order>> = store::load(&db, &admin_orders_key()).await?;
        assert!(orders.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_seeded_once() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = demo_seed();

        assert!(ensure_catalog_seeded(&db, &seeds).await?);
        assert!(!ensure_catalog_seeded(&db, &seeds).await?);

        let menu: Vec<MenuItem> = store::load_or_default(&db, &menu_key()).await?;
        assert_eq!(menu.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_seeding_never_overwrites_existing_data() -> Result<()> {
        let db = setup_test_db().await?;
        let mine = vec![MenuItem {
            id: 99,
            name: "Soup".to_string(),
            price: 5.0,
            category: Category::Starters,
            image: None,
            available: true,
        }];
        store::replace(&db, &menu_key(), &mine).await?;

        assert!(!ensure_catalog_seeded(&db, &demo_seed()).await?);
        assert!(!ensure_catalog_seeded(&db, &demo_seed()).await?);

        let menu: Vec<MenuItem> = store::load_or_default(&db, &menu_key()).await?;
        assert_eq!(menu, mine);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_collection_is_reseeded() -> Result<()> {
        let db = setup_test_db().await?;
        store::replace::<_, MenuItem>(&db, &menu_key(), &[]).await?;

        assert!(ensure_catalog_seeded(&db, &demo_seed()).await?);
        let menu: Vec<MenuItem> = store::load_or_default(&db, &menu_key()).await?;
        assert_eq!(menu.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_orders_seeded_once() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = demo_seed();

        assert!(ensure_admin_orders_seeded(&db, &seeds).await?);
        let first: Vec<Order> = store::load_or_default(&db, &admin_orders_key()).await?;

        assert!(!ensure_admin_orders_seeded(&db, &seeds).await?);
        let second: Vec<Order> = store::load_or_default(&db, &admin_orders_key()).await?;

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_provider_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = SeedConfig::default();

        assert!(!ensure_catalog_seeded(&db, &seeds).await?);
        let menu: Option<Vec<MenuItem>> = store::load(&db, &menu_key()).await?;
        assert!(menu.is_none());
        Ok(())
    }
}
