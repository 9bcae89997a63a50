//! `window.localStorage` as a [`KeyValueStore`].

use ink_store::{KeyValueStore, StoreError, StoreResult};
use wasm_bindgen::JsValue;
use web_sys::{window, Storage};

use crate::error::{js_message, WebError};

/// The browser's `localStorage`.
///
/// Holds no handle: each call looks the storage up again, so the type stays
/// `Send + Sync` like every other backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// Check that storage is reachable before handing the backend out.
    pub fn open() -> Result<Self, WebError> {
        Self::storage().map_err(|_| WebError::StorageUnavailable)?;
        Ok(Self)
    }

    fn storage() -> StoreResult<Storage> {
        window()
            .ok_or_else(|| StoreError::Backend("no window available".into()))?
            .local_storage()
            .map_err(backend_error)?
            .ok_or_else(|| StoreError::Backend("localStorage not available".into()))
    }
}

fn backend_error(value: JsValue) -> StoreError {
    StoreError::Backend(js_message(&value))
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Self::storage()?.get_item(key).map_err(backend_error)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        // Throws QuotaExceededError when the origin's quota is used up.
        Self::storage()?.set_item(key, value).map_err(backend_error)
    }

    fn remove_item(&self, key: &str) -> StoreResult<bool> {
        let storage = Self::storage()?;
        let present = storage.get_item(key).map_err(backend_error)?.is_some();
        storage.remove_item(key).map_err(backend_error)?;
        Ok(present)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let storage = Self::storage()?;
        let len = storage.length().map_err(backend_error)?;
        let mut keys = Vec::with_capacity(len as usize);
        for index in 0..len {
            if let Some(key) = storage.key(index).map_err(backend_error)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
