//! Persistence layer — the confirmed placement in a libSQL database.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{Database, PlacementRecord};
