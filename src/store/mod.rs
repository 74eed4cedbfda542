//! Store Module
//!
//! Key-value persistence the ledger and session are written to.

mod memory;

pub use memory::MemoryStore;

// == Key Value Store ==
/// A string-keyed, string-valued store with no transaction boundary.
///
/// Writers overwrite whole entries; concurrent writers sharing one store
/// resolve as last write wins.
pub trait KeyValueStore {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String);

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
