//! Core state logic - framework-agnostic catalog, cart, order and account operations.
//!
//! Every collection is read in full, transformed in memory and written back in full
//! through [`store`]. Callers pass an explicit [`session::Session`] or
//! [`namespace::Identity`]; nothing here reads ambient "current user" state.

pub mod cart;
pub mod catalog;
pub mod namespace;
pub mod orders;
pub mod seed;
pub mod session;
pub mod store;
pub mod users;

use chrono::Utc;

/// Returns a timestamp-based id (milliseconds) that is strictly greater than every
/// id in `existing`.
pub(crate) fn next_timestamp_id(existing: impl IntoIterator<Item = i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    existing
        .into_iter()
        .max()
        .map_or(now, |max| now.max(max.saturating_add(1)))
}
