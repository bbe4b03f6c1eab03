//! Durable product storage
//!
//! The reference backend persists the whole record set as one JSON array
//! on every write (snapshot overwrite, not an append log). Loading is
//! idempotent and tolerant of absent, empty, or corrupt backing data.

mod json_file;
mod traits;

pub use json_file::JsonFileStorage;
pub use traits::{ProductStorage, StorageError, StorageResult};
