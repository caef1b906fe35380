pub mod kv;
pub mod prefs;

pub use kv::{KeyValueStore, MemoryStore, StoreError};
pub use prefs::{PlayState, PreferenceStore, Preferences, ThemePreference};
