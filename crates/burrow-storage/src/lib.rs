//! Mapping store backends for Burrow.
//!
//! [`JsonFileRepository`] keeps the table in memory and mirrors it to a
//! pretty-printed JSON file that is replaced atomically after every insert.
//! [`InMemoryRepository`] keeps nothing on disk.

pub mod file;
pub mod memory;

pub use burrow_core::error::{Result, StorageError};
pub use burrow_core::repository::{ReadRepository, Repository};
pub use file::JsonFileRepository;
pub use memory::InMemoryRepository;
