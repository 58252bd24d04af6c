//! PlumbConnect core: session storage, shared errors and tracing setup

pub mod error;
pub mod storage;
pub mod tracing;

pub use error::{CoreError, CoreResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
