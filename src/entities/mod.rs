//! Entity module - Contains the SeaORM entity definitions for the database.
//! The state layer persists every collection as a single snapshot row, so there is
//! one table keyed by namespace.

pub mod collection;

pub use collection::{Entity as Collection, Model as CollectionModel};
