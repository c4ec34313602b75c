//! Database models, schema and seed helpers

pub mod init;
pub mod models;
pub mod seed;

pub use init::*;
pub use models::*;
