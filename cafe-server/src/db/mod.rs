//! Database layer
//!
//! Embedded redb file at `work_dir/database/cafe.redb`.

pub mod repository;
pub mod storage;

pub use storage::{Resource, Storage, StorageError, StorageResult};
