//! Recipe and similarity storage for Recetario.
//!
//! This crate provides the storage abstraction for users, recipes and
//! similarity edges. Two implementations are included: an in-memory store
//! used in tests and a SQLite store used by the server and the maintenance
//! binary. Both keep the similarity relation consistent: edges are written
//! in mirrored pairs and the same ordered pair is never stored twice.

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use store::*;
