use crate::error::StoreResult;

/// String-keyed, string-valued persistent storage.
///
/// This is the `localStorage` model: flat keys, opaque text values, no
/// transactions. Implementations use interior mutability so a store can be
/// shared by reference between the repository and its callers.
///
/// All implementations must satisfy these invariants:
/// - `set_item` fully replaces the previous value for the key.
/// - A value written by `set_item` is returned unchanged by `get_item`.
/// - `keys` lists every key currently holding a value, in any order.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key holds no value.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if it held a value.
    fn remove_item(&self, key: &str) -> StoreResult<bool>;

    /// List all keys currently holding a value.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Returns `true` if `key` holds a value.
    ///
    /// Default implementation reads the value; backends may override.
    fn contains_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<bool> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn contains_key(&self, key: &str) -> StoreResult<bool> {
        (**self).contains_key(key)
    }
}
