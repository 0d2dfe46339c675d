//! Platform abstraction layer
//!
//! Handles browser/native differences for persistent storage
//! (LocalStorage on web, files on native).

pub mod storage;

pub use storage::{MemoryStorage, Storage, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
