//! Client-side key/value storage for session state
//!
//! String keys mapped to string values, read on every authenticated call and
//! overwritten on login, refresh and logout.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::CoreResult;

/// String key/value storage shared by every clone of a client
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> CoreResult<()>;
}

#[cfg(test)]
pub(crate) fn exercise_store(store: &dyn KeyValueStore) {
    assert_eq!(store.get("access_token"), None);

    store.set("access_token", "A1").unwrap();
    store.set("refresh_token", "R1").unwrap();
    assert_eq!(store.get("access_token").as_deref(), Some("A1"));

    store.set("access_token", "A2").unwrap();
    assert_eq!(store.get("access_token").as_deref(), Some("A2"));
    assert_eq!(store.get("refresh_token").as_deref(), Some("R1"));

    store.remove("access_token").unwrap();
    store.remove("access_token").unwrap();
    assert_eq!(store.get("access_token"), None);
    assert_eq!(store.get("refresh_token").as_deref(), Some("R1"));
}
