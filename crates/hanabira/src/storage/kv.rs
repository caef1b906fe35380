use std::collections::HashMap;

use thiserror::Error;

/// Failures of the persisted key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend is missing or refused the operation (quota, privacy mode).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The stored blob could not be encoded or decoded.
    #[error("malformed stored JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The stored blob is valid JSON but not an object.
    #[error("stored progress record is not a JSON object")]
    NotAnObject,
}

/// String-keyed persistent store (browser `localStorage` / `sessionStorage`).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store. Used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
