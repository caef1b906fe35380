//! Visit, interaction and active-time accounting on top of the preference store.

use serde::Serialize;

use crate::api::config::DecorConfig;
use crate::api::types::{DecorEvent, Notification};
use crate::core::timer::{Delay, IntervalTimer};
use crate::input::queue::ClickTarget;
use crate::storage::kv::KeyValueStore;
use crate::storage::prefs::PreferenceStore;

pub const SECRET_MESSAGE: &str = "secret_message";
pub const APOLOGY_ACCEPTED: &str = "apology_accepted";
pub const ALL_PAGES_VISITED: &str = "all_pages_visited";
pub const MUSIC_LISTENER: &str = "music_listener";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const ACHIEVEMENTS: [Achievement; 3] = [
    Achievement { id: APOLOGY_ACCEPTED, title: "Forgiveness", description: "Accepted the apology" },
    Achievement { id: ALL_PAGES_VISITED, title: "Explorer", description: "Visited all pages" },
    Achievement { id: MUSIC_LISTENER, title: "Music Lover", description: "Listened to all tracks" },
];

pub fn achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Page name from a location path: the last segment, or `index.html` for a directory.
pub fn page_name(path: &str) -> String {
    let path = path.split(&['?', '#'][..]).next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => "index.html".to_string(),
    }
}

/// `<h>h <m>m` from milliseconds.
pub fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDot {
    pub page: String,
    pub visited: bool,
    pub active: bool,
}

/// What the page's progress indicators should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub dots: Vec<PageDot>,
    pub counter: String,
    pub visited_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub pages_visited: usize,
    pub total_pages: usize,
    pub total_time: String,
    pub interactions: u64,
    pub secrets_found: usize,
    pub favorite_page: Option<String>,
}

pub struct ProgressTracker {
    page: String,
    pages: Vec<String>,
    today: String,
    /// Time since init, driven by ticks.
    now_ms: f64,
    last_active_ms: f64,
    activity_window_ms: f64,
    welcome_delay_ms: f64,
    autosave: IntervalTimer,
    activity_check: IntervalTimer,
    welcome: Delay,
}

impl ProgressTracker {
    pub fn new(config: &DecorConfig, page: &str) -> Self {
        Self {
            page: page_name(page),
            pages: config.pages.clone(),
            today: String::new(),
            now_ms: 0.0,
            last_active_ms: 0.0,
            activity_window_ms: config.activity_window_ms,
            welcome_delay_ms: config.welcome_delay_ms,
            autosave: IntervalTimer::new(config.autosave_ms),
            activity_check: IntervalTimer::new(config.activity_window_ms),
            welcome: Delay::idle(),
        }
    }

    /// Record the current page visit. Expects the store to be loaded already.
    pub fn init<S: KeyValueStore>(
        &mut self,
        prefs: &mut PreferenceStore<S>,
        today: &str,
        events: &mut Vec<DecorEvent>,
    ) {
        self.today = today.to_string();
        if prefs.visit_page(&self.page, today) {
            log::info!("progress: first visit to {}", self.page);
        }
        prefs.set_favorite_page(&self.page);
        events.push(DecorEvent::ProgressChanged);

        if self.pages.iter().all(|p| prefs.preferences().visited_pages.contains(p)) {
            self.record_achievement(ALL_PAGES_VISITED, prefs, events);
        }

        if prefs.preferences().visited_pages.len() > 1
            && prefs.last_welcome().as_deref() != Some(today)
        {
            self.welcome.arm(self.welcome_delay_ms);
        }
    }

    /// Count a document click. Only buttons and links count.
    pub fn click<S: KeyValueStore>(
        &mut self,
        target: ClickTarget,
        prefs: &mut PreferenceStore<S>,
        events: &mut Vec<DecorEvent>,
    ) {
        if !target.interactive {
            return;
        }
        prefs.record_interaction();
        if target.secret {
            self.record_secret(SECRET_MESSAGE, prefs, events);
        }
        if target.accept {
            self.record_achievement(APOLOGY_ACCEPTED, prefs, events);
        }
    }

    pub fn input<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>) {
        prefs.record_interaction();
    }

    /// Refresh the activity timestamp.
    pub fn activity(&mut self) {
        self.last_active_ms = self.now_ms;
    }

    /// Record a secret once. A new secret is announced and saved right away.
    pub fn record_secret<S: KeyValueStore>(
        &mut self,
        id: &str,
        prefs: &mut PreferenceStore<S>,
        events: &mut Vec<DecorEvent>,
    ) -> bool {
        if !prefs.add_secret(id) {
            return false;
        }
        let total = prefs.preferences().secrets_found.len();
        events.push(DecorEvent::Notify(Notification::progress(format!(
            "🎉 Secret Found! Total: {total}"
        ))));
        prefs.save(self.now_ms);
        true
    }

    /// Record a known achievement once. Unknown ids are ignored.
    pub fn record_achievement<S: KeyValueStore>(
        &mut self,
        id: &str,
        prefs: &mut PreferenceStore<S>,
        events: &mut Vec<DecorEvent>,
    ) -> bool {
        let Some(achievement) = achievement(id) else {
            log::debug!("progress: unknown achievement `{id}`");
            return false;
        };
        if !prefs.add_achievement(id) {
            return false;
        }
        log::info!("progress: achievement {}", achievement.id);
        events.push(DecorEvent::Notify(Notification::progress(format!(
            "🏆 Achievement Unlocked: {}",
            achievement.title
        ))));
        true
    }

    pub fn tick<S: KeyValueStore>(
        &mut self,
        dt_ms: f64,
        prefs: &mut PreferenceStore<S>,
        events: &mut Vec<DecorEvent>,
    ) {
        self.now_ms += dt_ms;

        for _ in 0..self.activity_check.tick(dt_ms) {
            if self.now_ms - self.last_active_ms < self.activity_window_ms {
                prefs.add_time(self.activity_window_ms as u64);
            }
        }

        if self.autosave.tick(dt_ms) > 0 {
            prefs.save(self.now_ms);
        }

        if self.welcome.tick(dt_ms) {
            let visited = prefs.preferences().visited_pages.len();
            events.push(DecorEvent::Notify(Notification::progress(format!(
                "Welcome back! You've visited {visited} pages."
            ))));
            prefs.set_last_welcome(&self.today);
        }
    }

    /// Flush before the page goes away.
    pub fn unload<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>) {
        prefs.save(self.now_ms);
    }

    /// Wipe all progress and reload the current page.
    pub fn reset<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>, events: &mut Vec<DecorEvent>) {
        prefs.reset();
        log::info!("progress: reset");
        events.push(DecorEvent::ProgressChanged);
        events.push(DecorEvent::Navigate { url: self.page.clone() });
    }

    pub fn destroy(&mut self) {
        self.autosave.stop();
        self.activity_check.stop();
        self.welcome.cancel();
    }

    pub fn view<S: KeyValueStore>(&self, prefs: &PreferenceStore<S>) -> ProgressView {
        let visited = &prefs.preferences().visited_pages;
        let dots = self
            .pages
            .iter()
            .map(|page| PageDot {
                page: page.clone(),
                visited: visited.contains(page),
                active: *page == self.page,
            })
            .collect();
        let page_number = self.pages.iter().position(|p| *p == self.page).map_or(0, |i| i + 1);
        ProgressView {
            dots,
            counter: format!(
                "Page {}/{} • {} pages visited",
                page_number,
                self.pages.len(),
                visited.len()
            ),
            visited_count: visited.len(),
        }
    }

    pub fn stats<S: KeyValueStore>(&self, prefs: &PreferenceStore<S>) -> Stats {
        let p = prefs.preferences();
        Stats {
            pages_visited: p.visited_pages.len(),
            total_pages: self.pages.len(),
            total_time: format_duration(p.total_time),
            interactions: p.interactions,
            secrets_found: p.secrets_found.len(),
            favorite_page: p.favorite_page.clone(),
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
