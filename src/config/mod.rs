/// Administrator credentials from environment variables
pub mod admin;

/// Checkout backend location
pub mod checkout;

/// Database configuration and connection management
pub mod database;

/// Seed data loading from config.toml
pub mod seed;
