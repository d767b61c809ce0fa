//! Order ledger and order lifecycle.
//!
//! Orders live in two independent partitions: each customer's history under
//! `laurent-orders:<email>`, and the admin-wide ledger under `laurent-orders-all`.
//! Customers place and cancel orders in their own history; the administrator reads
//! and updates the admin ledger. Nothing copies orders between the two.

use crate::{
    checkout::{CheckoutGateway, CheckoutRequest, CheckoutUser},
    core::{
        cart,
        namespace::{Identity, admin_orders_key, cart_key, orders_key},
        next_timestamp_id,
        seed::{SeedProvider, ensure_admin_orders_seeded},
        session::{Session, SessionUser},
        store,
    },
    errors::{Error, Result},
    models::{CartLine, Order, OrderStatus, PaymentMethod},
};
use chrono::{DateTime, Local};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, warn};

const ORDER_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Outcome of [`place_order`].
#[derive(Debug, Clone, PartialEq)]
pub enum Checkout {
    /// Cash on delivery: the order was recorded and the cart cleared.
    Placed(Order),
    /// Card payment: send the customer to the hosted checkout page.
    Redirect { url: String },
}

/// Human-readable order timestamp, e.g. `3/7/2025, 2:05:09 PM`.
#[must_use]
pub fn format_order_date(at: DateTime<Local>) -> String {
    at.format(ORDER_DATE_FORMAT).to_string()
}

/// Builds an order from a snapshot of `items`, dated now.
///
/// The total is always recomputed from the lines.
#[must_use]
pub fn build_order(id: i64, customer: &str, items: &[CartLine], status: OrderStatus) -> Order {
    Order {
        id,
        customer: customer.to_string(),
        items: items.to_vec(),
        total: cart::total(items),
        status,
        date: format_order_date(Local::now()),
    }
}

/// Order history owned by `identity`, newest first.
pub async fn order_history(db: &DatabaseConnection, identity: &Identity) -> Result<Vec<Order>> {
    store::load_or_default(db, &orders_key(identity)).await
}

/// Checks out the session's cart.
///
/// Cash on delivery records a `COD - Pending` order at the top of the customer's
/// history and empties the cart in one transaction. Card payment asks `gateway` for
/// a checkout session and returns its URL; the ledger and the cart are left as
/// they are until the payment backend confirms.
///
/// # Errors
/// - [`Error::AuthRequired`] for a guest session
/// - [`Error::EmptyCart`] when the cart has no lines
/// - [`Error::PaymentSession`] when the gateway fails or returns no URL
pub async fn place_order<G: CheckoutGateway>(
    db: &DatabaseConnection,
    session: &Session,
    method: PaymentMethod,
    gateway: &G,
) -> Result<Checkout> {
    let user = session.require_user()?;
    let identity = session.identity();

    match method {
        PaymentMethod::CashOnDelivery => {
            let order = record_order(db, user, &identity, method.initial_status()).await?;
            Ok(Checkout::Placed(order))
        }
        PaymentMethod::Card => {
            let lines = cart::load_cart(db, &identity).await?;
            if lines.is_empty() {
                return Err(Error::EmptyCart);
            }

            let request = CheckoutRequest {
                cart: lines,
                user: CheckoutUser {
                    email: user.email.to_string(),
                    name: user.name.clone(),
                },
            };
            let checkout = gateway.create_session(&request).await.map_err(|e| match e {
                Error::PaymentSession { .. } => e,
                other => Error::PaymentSession {
                    message: other.to_string(),
                },
            })?;

            if checkout.url.trim().is_empty() {
                return Err(Error::PaymentSession {
                    message: "no redirect URL returned".to_string(),
                });
            }

            info!("Redirecting {} to hosted checkout", user.email);
            Ok(Checkout::Redirect { url: checkout.url })
        }
    }
}

async fn record_order(
    db: &DatabaseConnection,
    user: &SessionUser,
    identity: &Identity,
    status: OrderStatus,
) -> Result<Order> {
    let cart_namespace = cart_key(identity);
    let history_namespace = orders_key(identity);

    let txn = db.begin().await?;

    let lines: Vec<CartLine> = store::load_or_default(&txn, &cart_namespace).await?;
    if lines.is_empty() {
        return Err(Error::EmptyCart);
    }

    let mut history: Vec<Order> = store::load_or_default(&txn, &history_namespace).await?;
    let id = next_timestamp_id(history.iter().map(|order| order.id));
    let order = build_order(id, user.email.as_str(), &lines, status);
    history.insert(0, order.clone());

    store::replace(&txn, &history_namespace, &history).await?;
    store::replace::<_, CartLine>(&txn, &cart_namespace, &[]).await?;
    txn.commit().await?;

    info!(
        "Order {} placed by {} for {:.2} ({} lines)",
        order.id,
        user.email,
        order.total,
        order.items.len()
    );
    Ok(order)
}

/// Cancels one of the session's own orders.
///
/// Only a pending order can be cancelled; for any other status nothing changes.
/// Returns whether the order was cancelled.
pub async fn cancel_order(db: &DatabaseConnection, session: &Session, id: i64) -> Result<bool> {
    session.require_user()?;

    let mut cancelled = false;
    store::mutate(db, &orders_key(&session.identity()), |orders: &mut Vec<Order>| {
        if let Some(order) = orders
            .iter_mut()
            .find(|order| order.id == id && order.status.is_pending())
        {
            order.status = OrderStatus::Cancelled;
            cancelled = true;
        }
        Ok(())
    })
    .await?;

    if !cancelled {
        debug!("Order {id} not cancellable");
    }
    Ok(cancelled)
}

/// The admin-wide ledger, seeded from `seeds` on first access.
pub async fn admin_orders(
    db: &DatabaseConnection,
    session: &Session,
    seeds: &impl SeedProvider,
) -> Result<Vec<Order>> {
    session.require_admin()?;
    ensure_admin_orders_seeded(db, seeds).await?;
    store::load_or_default(db, &admin_orders_key()).await
}

/// Sets the status of an order in the admin ledger.
///
/// The administrator may move an order to any status. Changes outside the normal
/// lifecycle are applied but logged. Returns `false` when no order has `id`.
pub async fn set_status(
    db: &DatabaseConnection,
    session: &Session,
    id: i64,
    status: OrderStatus,
) -> Result<bool> {
    let admin = session.require_admin()?;

    let mut updated = false;
    store::mutate(db, &admin_orders_key(), |orders: &mut Vec<Order>| {
        let Some(order) = orders.iter_mut().find(|order| order.id == id) else {
            return Ok(());
        };
        if order.status != status && !order.status.can_transition_to(status) {
            warn!(
                "{} overrides order {id}: {} -> {status}",
                admin.email, order.status
            );
        }
        order.status = status;
        updated = true;
        Ok(())
    })
    .await?;

    if updated {
        info!("Order {id} is now {status}");
    } else {
        debug!("Order {id} not in admin ledger");
    }
    Ok(updated)
}

/// Marks an order as confirmed.
pub async fn confirm_order(db: &DatabaseConnection, session: &Session, id: i64) -> Result<bool> {
    set_status(db, session, id, OrderStatus::Confirmed).await
}

/// Marks an order as delivered.
pub async fn deliver_order(db: &DatabaseConnection, session: &Session, id: i64) -> Result<bool> {
    set_status(db, session, id, OrderStatus::Delivered).await
}

/// Cancels an order on the restaurant's side.
pub async fn cancel_order_as_admin(
    db: &DatabaseConnection,
    session: &Session,
    id: i64,
) -> Result<bool> {
    set_status(db, session, id, OrderStatus::Cancelled).await
}
