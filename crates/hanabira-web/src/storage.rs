use hanabira::{KeyValueStore, StoreError};
use web_sys::Storage;

/// `localStorage` or `sessionStorage`.
///
/// A missing or blocked store (private mode, disabled cookies) still
/// constructs; every call then reports `StoreError::Unavailable`.
pub struct WebStorage {
    storage: Option<Storage>,
    name: &'static str,
}

impl WebStorage {
    pub fn local() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self::wrap(storage, "localStorage")
    }

    pub fn session() -> Self {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
        Self::wrap(storage, "sessionStorage")
    }

    fn wrap(storage: Option<Storage>, name: &'static str) -> Self {
        if storage.is_none() {
            log::warn!("{name} is not available; progress will not persist");
        }
        Self { storage, name }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable(format!("{} is not available", self.name)))
    }
}

fn js_error(name: &str, err: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Unavailable(format!("{name}: {err:?}"))
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(|e| js_error(self.name, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, value).map_err(|e| js_error(self.name, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?.remove_item(key).map_err(|e| js_error(self.name, e))
    }
}
