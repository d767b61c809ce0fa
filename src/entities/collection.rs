//! Collection entity - One row per namespace key holding a full JSON snapshot.
//!
//! Every logical collection (users, menu, admin orders, each cart, each order
//! history) lives in exactly one row. Writes always replace the whole `payload`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Namespaced collection snapshot
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    /// Derived storage key (e.g. `"laurent-cart:laiba@gmail.com"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub namespace_key: String,
    /// JSON array encoding the whole collection
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    /// When the snapshot was last replaced
    pub updated_at: DateTimeUtc,
}

/// `Collection` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
