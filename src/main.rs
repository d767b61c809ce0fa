use dotenvy::dotenv;
use laurent_orders::{
    checkout::HttpCheckoutClient,
    config::{
        admin::AdminCredentials,
        database::{create_connection, create_tables},
        seed::{SeedConfig, default_config_path, load_config},
    },
    core::{
        namespace::{admin_orders_key, menu_key, users_key},
        seed::{demo_seed, ensure_admin_orders_seeded, ensure_catalog_seeded},
        store,
        users::ensure_admin_user,
    },
    errors::Result,
    models::{MenuItem, Order, User},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn load_seed_config() -> Result<SeedConfig> {
    let path = default_config_path();
    if path.exists() {
        let config = load_config(&path)?;
        info!("Loaded seed data from {}", path.display());
        Ok(config)
    } else {
        info!("No seed file at {}; using built-in demo data.", path.display());
        Ok(demo_seed())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load seed data and admin credentials
    let seeds = load_seed_config().inspect_err(|e| error!("Failed to load seed data: {e}"))?;
    let admin = AdminCredentials::from_env()
        .inspect_err(|e| error!("Invalid administrator configuration: {e}"))?;

    // 4. Initialize database
    let db = create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    create_tables(&db).await?;

    // 5. Seed the admin account, catalog and admin ledger when empty
    if ensure_admin_user(&db, &admin).await? {
        info!("Administrator account {} created.", admin.email);
    }
    if ensure_catalog_seeded(&db, &seeds).await? {
        info!("Menu seeded.");
    }
    if ensure_admin_orders_seeded(&db, &seeds).await? {
        info!("Admin order ledger seeded.");
    }

    let users: Vec<User> = store::load_or_default(&db, &users_key()).await?;
    let menu: Vec<MenuItem> = store::load_or_default(&db, &menu_key()).await?;
    let orders: Vec<Order> = store::load_or_default(&db, &admin_orders_key()).await?;
    info!(
        "Store ready: {} users, {} menu items, {} orders in admin ledger",
        users.len(),
        menu.len(),
        orders.len()
    );

    // 6. Probe the checkout backend
    let checkout = HttpCheckoutClient::from_env();
    match checkout.health().await {
        Ok(true) => info!("Checkout backend at {} is up.", checkout.base_url()),
        Ok(false) => warn!("Checkout backend at {} reports unavailable.", checkout.base_url()),
        Err(e) => warn!("Checkout backend at {} unreachable: {e}", checkout.base_url()),
    }

    Ok(())
}
