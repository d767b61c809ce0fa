//! Catalog business logic - Handles all menu-item operations.
//!
//! The menu is one global collection. Any session may read it; only the administrator
//! may change it. Reads run the seeding check first, so a fresh store always shows the
//! demo menu. Every mutation rewrites the whole catalog in a single transaction, and a
//! rejected input never reaches storage.

use crate::{
    core::{
        namespace::menu_key,
        next_timestamp_id,
        seed::{SeedProvider, ensure_catalog_seeded},
        session::Session,
        store,
    },
    errors::{Error, Result},
    models::{MenuItem, MenuItemInput},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

/// Retrieves the whole catalog in stored order, seeding it first if it is empty.
///
/// Newly created items sit at the front; edits keep an item in place. This is the
/// administrator's view and includes unavailable items.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_items(
    db: &DatabaseConnection,
    seeds: &impl SeedProvider,
) -> Result<Vec<MenuItem>> {
    ensure_catalog_seeded(db, seeds).await?;
    store::load_or_default(db, &menu_key()).await
}

/// Retrieves the items customers and guests may order.
///
/// Unavailable items are hidden but not deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_available_items(
    db: &DatabaseConnection,
    seeds: &impl SeedProvider,
) -> Result<Vec<MenuItem>> {
    let mut items = list_items(db, seeds).await?;
    items.retain(|item| item.available);
    Ok(items)
}

/// Finds a menu item by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_item(db: &DatabaseConnection, id: i64) -> Result<Option<MenuItem>> {
    let items: Vec<MenuItem> = store::load_or_default(db, &menu_key()).await?;
    Ok(items.into_iter().find(|item| item.id == id))
}

/// Checks admin form input and returns the trimmed name.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The price is not finite (NaN, infinity) or not greater than zero
pub fn validate_input(input: &MenuItemInput) -> Result<String> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Menu item name cannot be empty".to_string(),
        });
    }

    if !input.price.is_finite() || input.price <= 0.0 {
        return Err(Error::InvalidPrice { price: input.price });
    }

    Ok(name.to_string())
}

/// Creates or edits a menu item.
///
/// With `input.id == None` a new item with a fresh timestamp id is placed at the
/// front of the catalog. With `Some(id)` the matching item's fields are replaced
/// while its id and position are kept.
///
/// # Errors
/// Returns an error if:
/// - The session is not the administrator
/// - The input fails [`validate_input`]
/// - An edit names an id that is not in the catalog
/// - The database operation fails
pub async fn upsert_item(
    db: &DatabaseConnection,
    session: &Session,
    input: MenuItemInput,
) -> Result<MenuItem> {
    session.require_admin()?;
    let name = validate_input(&input)?;

    let mut saved = None;
    store::mutate(db, &menu_key(), |items: &mut Vec<MenuItem>| {
        match input.id {
            Some(id) => {
                let item = items
                    .iter_mut()
                    .find(|item| item.id == id)
                    .ok_or(Error::ItemNotFound { id })?;
                item.name = name;
                item.price = input.price;
                item.category = input.category;
                item.image = input.image;
                item.available = input.available;
                saved = Some(item.clone());
            }
            None => {
                let item = MenuItem {
                    id: next_timestamp_id(items.iter().map(|item| item.id)),
                    name,
                    price: input.price,
                    category: input.category,
                    image: input.image,
                    available: input.available,
                };
                items.insert(0, item.clone());
                saved = Some(item);
            }
        }
        Ok(())
    })
    .await?;

    let item = saved.ok_or_else(|| Error::Validation {
        message: "menu item was not saved".to_string(),
    })?;
    info!("Saved menu item {} ({})", item.id, item.name);
    Ok(item)
}

/// Removes a menu item. Deleting an id that is not present is not an error.
///
/// # Errors
/// Returns an error if the session is not the administrator or the database
/// operation fails.
pub async fn delete_item(db: &DatabaseConnection, session: &Session, id: i64) -> Result<()> {
    session.require_admin()?;
    store::mutate(db, &menu_key(), |items: &mut Vec<MenuItem>| {
        items.retain(|item| item.id != id);
        Ok(())
    })
    .await?;
    debug!("Deleted menu item {id}");
    Ok(())
}

/// Flips the `available` flag of a menu item; unknown ids are ignored.
///
/// Returns the updated item, if it exists.
///
/// # Errors
/// Returns an error if the session is not the administrator or the database
/// operation fails.
pub async fn toggle_availability(
    db: &DatabaseConnection,
    session: &Session,
    id: i64,
) -> Result<Option<MenuItem>> {
    session.require_admin()?;

    let mut toggled = None;
    store::mutate(db, &menu_key(), |items: &mut Vec<MenuItem>| {
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            item.available = !item.available;
            toggled = Some(item.clone());
        }
        Ok(())
    })
    .await?;

    if let Some(item) = &toggled {
        debug!("Menu item {id} available: {}", item.available);
    }
    Ok(toggled)
}
