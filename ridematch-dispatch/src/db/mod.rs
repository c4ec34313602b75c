//! Database access layer
//!
//! Free query functions over the SQLite pool (`rides`, `chairs`) and the
//! `DispatchStore` seam the matching engine consumes.

pub mod chairs;
pub mod rides;
pub mod store;

pub use store::{ChairBinding, DispatchStore, SqliteDispatchStore};
