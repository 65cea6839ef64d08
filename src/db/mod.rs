pub mod cache;
pub mod dhikr;
pub mod migrations;
pub mod store;

pub use store::{SqliteStore, Storage, StorageError};
