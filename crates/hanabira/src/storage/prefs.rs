use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kv::{KeyValueStore, StoreError};

/// Aggregated progress record.
pub const PROGRESS_KEY: &str = "animeApologyProgress";
/// Music volume as a decimal string.
pub const VOLUME_KEY: &str = "animePlayerVolume";
/// Music playback state, `playing` or `paused`.
pub const PLAY_STATE_KEY: &str = "animePlayerState";
/// Date of the last welcome-back notification.
pub const LAST_WELCOME_KEY: &str = "lastWelcome";
/// Session flag set after the loading screen has been shown once.
pub const FIRST_LOAD_KEY: &str = "firstLoad";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Auto,
    Day,
    Night,
}

impl ThemePreference {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "auto" => Some(ThemePreference::Auto),
            "day" => Some(ThemePreference::Day),
            "night" => Some(ThemePreference::Night),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Playing,
    #[default]
    Paused,
}

impl PlayState {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayState::Playing => "playing",
            PlayState::Paused => "paused",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "playing" => Some(PlayState::Playing),
            "paused" => Some(PlayState::Paused),
            _ => None,
        }
    }
}

/// The persisted preferences and progress record.
///
/// Every field has a default, so a partial blob always yields a complete record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Visited page names, first visit order, no duplicates.
    pub visited_pages: Vec<String>,
    /// Page name to `YYYY-MM-DD` of the latest visit.
    pub visited_dates: BTreeMap<String, String>,
    /// Accumulated time in milliseconds.
    pub total_time: u64,
    pub interactions: u64,
    /// The most recently visited page.
    pub favorite_page: Option<String>,
    pub theme_preference: ThemePreference,
    pub music_enabled: bool,
    pub volume: f32,
    pub play_state: PlayState,
    pub secrets_found: Vec<String>,
    pub achievements: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            visited_pages: Vec::new(),
            visited_dates: BTreeMap::new(),
            total_time: 0,
            interactions: 0,
            favorite_page: None,
            theme_preference: ThemePreference::Auto,
            music_enabled: true,
            volume: 0.5,
            play_state: PlayState::Paused,
            secrets_found: Vec::new(),
            achievements: Vec::new(),
        }
    }
}

impl Preferences {
    /// Shallow-merge a persisted object onto the defaults.
    ///
    /// Fields are applied one at a time; a field whose value does not fit
    /// its type is dropped and the default kept. Unknown keys are ignored.
    pub fn merged_from(persisted: Map<String, Value>) -> Self {
        let mut merged = match serde_json::to_value(Preferences::default()) {
            Ok(Value::Object(map)) => map,
            _ => return Preferences::default(),
        };

        for (key, value) in persisted {
            if !merged.contains_key(&key) {
                log::debug!("prefs: ignoring unknown field `{key}`");
                continue;
            }
            let previous = merged.insert(key.clone(), value);
            if serde_json::from_value::<Preferences>(Value::Object(merged.clone())).is_err() {
                log::warn!("prefs: dropping persisted field `{key}` with unexpected type");
                if let Some(previous) = previous {
                    merged.insert(key, previous);
                }
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or_default()
    }
}

/// Owner of the in-memory record and its persisted copy.
///
/// Mutations are synchronous on the record; the blob is rewritten on
/// `save()` (auto-flush, unload, secrets). Storage failures are logged and
/// never propagated from the non-`try_` methods.
pub struct PreferenceStore<S: KeyValueStore> {
    local: S,
    session: S,
    prefs: Preferences,
    last_flush_ms: f64,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(local: S, session: S) -> Self {
        Self {
            local,
            session,
            prefs: Preferences::default(),
            last_flush_ms: 0.0,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn local(&self) -> &S {
        &self.local
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Read the persisted record. Returns the merged record, `None` when nothing is stored.
    pub fn try_load(&self) -> Result<Option<Preferences>, StoreError> {
        let Some(raw) = self.local.get(PROGRESS_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(persisted) => Ok(Some(Preferences::merged_from(persisted))),
            _ => Err(StoreError::NotAnObject),
        }
    }

    /// Load and merge onto defaults. Failures leave the defaults in place.
    /// Returns true when a persisted record was found.
    pub fn load(&mut self) -> bool {
        match self.try_load() {
            Ok(Some(prefs)) => {
                log::info!(
                    "prefs: loaded progress ({} pages visited, {} secrets)",
                    prefs.visited_pages.len(),
                    prefs.secrets_found.len()
                );
                self.prefs = prefs;
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("prefs: could not load saved progress: {e}");
                self.prefs = Preferences::default();
                false
            }
        }
    }

    /// Fold the time since the previous flush into `totalTime` and write the blob.
    pub fn try_save(&mut self, now_ms: f64) -> Result<(), StoreError> {
        let since_flush = (now_ms - self.last_flush_ms).max(0.0);
        self.prefs.total_time = self.prefs.total_time.saturating_add(since_flush as u64);
        self.last_flush_ms = now_ms;

        let blob = serde_json::to_string(&self.prefs)?;
        self.local.set(PROGRESS_KEY, &blob)
    }

    pub fn save(&mut self, now_ms: f64) {
        match self.try_save(now_ms) {
            Ok(()) => log::debug!("prefs: progress saved"),
            Err(e) => log::warn!("prefs: could not save progress: {e}"),
        }
    }

    /// Remove the persisted record and restore defaults.
    pub fn reset(&mut self) {
        if let Err(e) = self.local.remove(PROGRESS_KEY) {
            log::warn!("prefs: could not clear saved progress: {e}");
        }
        self.prefs = Preferences::default();
    }

    // -- Field setters --

    /// Record a visit. Returns true when the page had not been visited before.
    pub fn visit_page(&mut self, page: &str, date: &str) -> bool {
        let first_visit = !self.prefs.visited_pages.iter().any(|p| p == page);
        if first_visit {
            self.prefs.visited_pages.push(page.to_string());
        }
        self.prefs.visited_dates.insert(page.to_string(), date.to_string());
        first_visit
    }

    pub fn set_favorite_page(&mut self, page: &str) {
        self.prefs.favorite_page = Some(page.to_string());
    }

    pub fn record_interaction(&mut self) {
        self.prefs.interactions += 1;
    }

    pub fn add_time(&mut self, ms: u64) {
        self.prefs.total_time = self.prefs.total_time.saturating_add(ms);
    }

    /// Returns true when the secret is new.
    pub fn add_secret(&mut self, id: &str) -> bool {
        insert_unique(&mut self.prefs.secrets_found, id)
    }

    /// Returns true when the achievement is new.
    pub fn add_achievement(&mut self, id: &str) -> bool {
        insert_unique(&mut self.prefs.achievements, id)
    }

    pub fn set_theme_preference(&mut self, theme: ThemePreference) {
        self.prefs.theme_preference = theme;
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.prefs.music_enabled = enabled;
    }

    /// Mirror the music volume into the record and its own key.
    pub fn set_volume(&mut self, volume: f32) {
        self.prefs.volume = volume;
        self.write_local(VOLUME_KEY, &volume.to_string());
    }

    /// Mirror the playback state into the record and its own key.
    pub fn set_play_state(&mut self, state: PlayState) {
        self.prefs.play_state = state;
        self.write_local(PLAY_STATE_KEY, state.as_str());
    }

    pub fn stored_volume(&self) -> Option<f32> {
        self.read_local(VOLUME_KEY)?.trim().parse::<f32>().ok().filter(|v| v.is_finite())
    }

    pub fn stored_play_state(&self) -> Option<PlayState> {
        PlayState::parse(&self.read_local(PLAY_STATE_KEY)?)
    }

    pub fn last_welcome(&self) -> Option<String> {
        self.read_local(LAST_WELCOME_KEY)
    }

    pub fn set_last_welcome(&mut self, date: &str) {
        self.write_local(LAST_WELCOME_KEY, date);
    }

    /// True on the first call within a browsing session; marks the session.
    pub fn take_first_load(&mut self) -> bool {
        match self.session.get(FIRST_LOAD_KEY) {
            Ok(Some(_)) => false,
            Ok(None) => {
                if let Err(e) = self.session.set(FIRST_LOAD_KEY, "true") {
                    log::warn!("prefs: could not mark session: {e}");
                }
                true
            }
            Err(e) => {
                log::warn!("prefs: session storage unavailable: {e}");
                false
            }
        }
    }

    fn read_local(&self, key: &str) -> Option<String> {
        match self.local.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("prefs: could not read `{key}`: {e}");
                None
            }
        }
    }

    fn write_local(&mut self, key: &str, value: &str) {
        if let Err(e) = self.local.set(key, value) {
            log::warn!("prefs: could not write `{key}`: {e}");
        }
    }
}

fn insert_unique(set: &mut Vec<String>, id: &str) -> bool {
    if set.iter().any(|s| s == id) {
        return false;
    }
    set.push(id.to_string());
    true
}
