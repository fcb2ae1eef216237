//! Persistence layer
//!
//! The key-value store adapter and its error types. Registries share one
//! [`KvStore`] handle and serialize their collections through it.

mod error;
mod kv;

pub use error::{StoreError, StoreResult};
pub use kv::{FileKvStore, KvStore, MemoryKvStore};
