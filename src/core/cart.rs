//! Cart business logic - per-identity line items.
//!
//! Carts work for guests and signed-in users alike; the namespace key derived from
//! the [`Identity`] decides which cart is touched. Each mutating call persists the
//! full cart immediately.

use crate::{
    core::{
        namespace::{Identity, cart_key},
        store,
    },
    errors::Result,
    models::{CartLine, MenuItem},
};
use sea_orm::DatabaseConnection;
use tracing::debug;

/// Sum of `price × qty` over all lines.
#[must_use]
pub fn total(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::subtotal).sum()
}

/// Loads the cart owned by `identity`; an unknown identity has an empty cart.
pub async fn load_cart(db: &DatabaseConnection, identity: &Identity) -> Result<Vec<CartLine>> {
    store::load_or_default(db, &cart_key(identity)).await
}

/// Adds one unit of `item`, merging into an existing line with the same id.
pub async fn add_item(
    db: &DatabaseConnection,
    identity: &Identity,
    item: &MenuItem,
) -> Result<Vec<CartLine>> {
    debug!("Adding item {} to cart of {identity:?}", item.id);
    store::mutate(db, &cart_key(identity), |lines: &mut Vec<CartLine>| {
        match lines.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.qty = line.qty.saturating_add(1),
            None => lines.push(CartLine::from_item(item)),
        }
        Ok(())
    })
    .await
}

/// Raises the quantity of line `id` by one. Unknown ids are ignored.
pub async fn increment_line(
    db: &DatabaseConnection,
    identity: &Identity,
    id: i64,
) -> Result<Vec<CartLine>> {
    store::mutate(db, &cart_key(identity), |lines: &mut Vec<CartLine>| {
        if let Some(line) = lines.iter_mut().find(|line| line.id == id) {
            line.qty = line.qty.saturating_add(1);
        }
        Ok(())
    })
    .await
}

/// Lowers the quantity of line `id` by one, never below one.
///
/// A line is only ever removed by [`remove_line`]; decrementing a line with
/// quantity one leaves it at one.
pub async fn decrement_line(
    db: &DatabaseConnection,
    identity: &Identity,
    id: i64,
) -> Result<Vec<CartLine>> {
    store::mutate(db, &cart_key(identity), |lines: &mut Vec<CartLine>| {
        if let Some(line) = lines.iter_mut().find(|line| line.id == id) {
            line.qty = line.qty.saturating_sub(1).max(1);
        }
        lines.retain(|line| line.qty > 0);
        Ok(())
    })
    .await
}

/// Deletes line `id` unconditionally.
pub async fn remove_line(
    db: &DatabaseConnection,
    identity: &Identity,
    id: i64,
) -> Result<Vec<CartLine>> {
    store::mutate(db, &cart_key(identity), |lines: &mut Vec<CartLine>| {
        lines.retain(|line| line.id != id);
        Ok(())
    })
    .await
}

/// Empties the cart owned by `identity`.
pub async fn clear_cart(db: &DatabaseConnection, identity: &Identity) -> Result<()> {
    store::replace::<_, CartLine>(db, &cart_key(identity), &[]).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_total_is_pure_sum() {
        let lines = vec![
            CartLine {
                id: 1,
                name: "Burger".to_string(),
                price: 8.0,
                qty: 2,
            },
            CartLine {
                id: 2,
                name: "Pizza".to_string(),
                price: 12.0,
                qty: 1,
            },
        ];
        assert_eq!(total(&lines), 28.0);
        assert_eq!(total(&[]), 0.0);
    }

    #[tokio::test]
    async fn test_repeated_add_merges_by_id() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = customer_identity("laiba@gmail.com");
        let burger = test_menu_item(1, "Burger", 8.0);

        for _ in 0..5 {
            add_item(&db, &identity, &burger).await?;
        }

        let cart = load_cart(&db, &identity).await?;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].qty, 5);
        assert_eq!(total(&cart), 40.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_lines_keep_insertion_order() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = Identity::Guest;

        add_item(&db, &identity, &test_menu_item(2, "Pizza", 12.0)).await?;
        add_item(&db, &identity, &test_menu_item(1, "Burger", 8.0)).await?;
        let cart = add_item(&db, &identity, &test_menu_item(2, "Pizza", 12.0)).await?;

        let ids: Vec<i64> = cart.iter().map(|line| line.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(cart[0].qty, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_decrement_never_drops_below_one() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = customer_identity("awais@gmail.com");
        add_item(&db, &identity, &test_menu_item(4, "Salad", 6.0)).await?;
        increment_line(&db, &identity, 4).await?;

        let cart = decrement_line(&db, &identity, 4).await?;
        assert_eq!(cart[0].qty, 1);

        for _ in 0..3 {
            decrement_line(&db, &identity, 4).await?;
        }
        let cart = load_cart(&db, &identity).await?;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].qty, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_line_and_unknown_ids() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = customer_identity("laiba@gmail.com");
        add_item(&db, &identity, &test_menu_item(1, "Burger", 8.0)).await?;
        add_item(&db, &identity, &test_menu_item(3, "Pasta", 10.0)).await?;

        let cart = increment_line(&db, &identity, 42).await?;
        assert_eq!(total(&cart), 18.0);

        let cart = remove_line(&db, &identity, 1).await?;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].id, 3);

        let cart = remove_line(&db, &identity, 1).await?;
        assert_eq!(cart.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_carts_are_isolated_per_identity() -> Result<()> {
        let db = setup_test_db().await?;
        let laiba = customer_identity("laiba@gmail.com");
        let laiba_upper = customer_identity("LAIBA@gmail.com");
        let awais = customer_identity("awais@gmail.com");

        add_item(&db, &laiba, &test_menu_item(1, "Burger", 8.0)).await?;
        add_item(&db, &laiba_upper, &test_menu_item(1, "Burger", 8.0)).await?;
        add_item(&db, &awais, &test_menu_item(2, "Pizza", 12.0)).await?;

        let laiba_cart = load_cart(&db, &laiba).await?;
        assert_eq!(laiba_cart.len(), 1);
        assert_eq!(laiba_cart[0].qty, 2);

        let awais_cart = load_cart(&db, &awais).await?;
        assert_eq!(awais_cart.len(), 1);
        assert_eq!(awais_cart[0].id, 2);

        assert!(load_cart(&db, &Identity::Guest).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = Identity::Guest;
        add_item(&db, &identity, &test_menu_item(1, "Burger", 8.0)).await?;

        clear_cart(&db, &identity).await?;
        assert!(load_cart(&db, &identity).await?.is_empty());
        Ok(())
    }
}
