//! Snapshot store - the only code that touches the `collections` table.
//!
//! A collection is always read whole and written whole. [`mutate`] wraps the
//! read → transform → write cycle in a database transaction, so a failing
//! transformation leaves the stored snapshot exactly as it was.

use crate::{
    core::namespace::NamespaceKey,
    entities::{Collection, collection},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

/// Loads the collection stored under `key`.
///
/// Returns `Ok(None)` when the key has never been written. A payload that no
/// longer decodes is logged and reported as missing.
#[instrument(skip_all, fields(key = %key))]
pub async fn load<C, T>(db: &C, key: &NamespaceKey) -> Result<Option<Vec<T>>>
where
    C: ConnectionTrait,
    T: DeserializeOwned,
{
    let Some(row) = Collection::find_by_id(key.as_str().to_owned()).one(db).await? else {
        debug!("No snapshot stored");
        return Ok(None);
    };

    match serde_json::from_str(&row.payload) {
        Ok(records) => Ok(Some(records)),
        Err(e) => {
            warn!("Discarding undecodable snapshot: {e}");
            Ok(None)
        }
    }
}

/// Loads the collection stored under `key`, or an empty one.
pub async fn load_or_default<C, T>(db: &C, key: &NamespaceKey) -> Result<Vec<T>>
where
    C: ConnectionTrait,
    T: DeserializeOwned,
{
    Ok(load(db, key).await?.unwrap_or_default())
}

/// Replaces the whole collection stored under `key` with `records`.
#[instrument(skip_all, fields(key = %key, len = records.len()))]
pub async fn replace<C, T>(db: &C, key: &NamespaceKey, records: &[T]) -> Result<()>
where
    C: ConnectionTrait,
    T: Serialize,
{
    let payload = serde_json::to_string(records)?;
    let now = Utc::now();

    let existing = Collection::find_by_id(key.as_str().to_owned()).one(db).await?;

    if let Some(row) = existing {
        let mut active_model: collection::ActiveModel = row.into();
        active_model.payload = Set(payload);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_row = collection::ActiveModel {
            namespace_key: Set(key.as_str().to_owned()),
            payload: Set(payload),
            updated_at: Set(now),
        };
        new_row.insert(db).await?;
    }

    debug!("Snapshot replaced");
    Ok(())
}

/// Reads the collection under `key`, applies `f`, and writes the result back.
///
/// Runs inside one database transaction. If `f` returns an error nothing is
/// written and the error is returned. On success the new snapshot is returned.
pub async fn mutate<C, T, F>(db: &C, key: &NamespaceKey, f: F) -> Result<Vec<T>>
where
    C: TransactionTrait,
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut Vec<T>) -> Result<()>,
{
    let txn = db.begin().await?;

    let mut records = load_or_default(&txn, key).await?;
    f(&mut records)?;
    replace(&txn, key, &records).await?;

    txn.commit().await?;
    Ok(records)
}
