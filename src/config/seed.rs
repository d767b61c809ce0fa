//! Seed data loading from config.toml
//!
//! This module provides functionality to load the demo catalog and demo admin
//! orders from a TOML configuration file. The data defined there is written to
//! the store on first access, when the corresponding collection is missing or empty.

use crate::core::catalog::validate_input;
use crate::errors::{Error, Result};
use crate::models::{CartLine, MenuItem, MenuItemInput, OrderStatus};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Menu items to seed into the catalog
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    /// Orders to seed into the admin-wide ledger
    #[serde(default)]
    pub orders: Vec<OrderSeed>,
}

/// Configuration for a single seeded admin order
#[derive(Debug, Deserialize, Clone)]
pub struct OrderSeed {
    /// Customer email shown on the order
    pub customer: String,
    /// Status the order starts in
    pub status: OrderStatus,
    /// How long ago the order was placed, relative to seeding time
    #[serde(default)]
    pub age_seconds: i64,
    /// Line items; the total is recomputed from these
    pub items: Vec<CartLine>,
}

impl SeedConfig {
    /// Checks that every seeded record satisfies the store's invariants.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if:
    /// - A menu item has an empty name or a price that is not greater than zero
    /// - Two menu items share an id
    /// - An order has no lines, a negative `age_seconds`, or a line with
    ///   quantity zero, an empty name or a non-positive price
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for item in &self.menu {
            let input = MenuItemInput {
                id: Some(item.id),
                name: item.name.clone(),
                price: item.price,
                category: item.category,
                image: item.image.clone(),
                available: item.available,
            };
            validate_input(&input).map_err(|e| Error::Config {
                message: format!("Invalid seed menu item {}: {e}", item.id),
            })?;
            if !ids.insert(item.id) {
                return Err(Error::Config {
                    message: format!("Duplicate seed menu item id {}", item.id),
                });
            }
        }

        for (index, order) in self.orders.iter().enumerate() {
            if order.items.is_empty() {
                return Err(Error::Config {
                    message: format!("Seed order {index} has no items"),
                });
            }
            if order.age_seconds < 0 {
                return Err(Error::Config {
                    message: format!("Seed order {index} has negative age_seconds"),
                });
            }
            for line in &order.items {
                if line.qty == 0 || line.name.trim().is_empty() {
                    return Err(Error::Config {
                        message: format!("Seed order {index} has an invalid line {}", line.id),
                    });
                }
                if !line.price.is_finite() || line.price <= 0.0 {
                    return Err(Error::Config {
                        message: format!(
                            "Seed order {index} line {} has invalid price {}",
                            line.id, line.price
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Loads seed configuration from a TOML file and validates it
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
/// - The data fails [`SeedConfig::validate`]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading seed configuration from {}", path_ref.display());
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    let config: SeedConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Path of the seed file: `LAURENT_CONFIG`, or `./config.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    std::env::var("LAURENT_CONFIG").map_or_else(|_| PathBuf::from("config.toml"), PathBuf::from)
}
