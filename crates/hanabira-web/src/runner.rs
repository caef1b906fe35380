use hanabira::systems::transition::EntranceSchedule;
use hanabira::{DecorApp, DecorConfig, InputEvent, InputQueue, SpriteInstance, GLYPHS};
use serde_json::json;

use crate::clock::JsClock;
use crate::storage::WebStorage;

/// Browser-side runner: owns the app, its input queue and the JSON views
/// handed to the page script.
///
/// Lives in a `thread_local!` in `lib.rs`, because wasm-bindgen cannot
/// export generic structs directly.
pub struct DecorRunner {
    app: DecorApp<WebStorage>,
    input: InputQueue,
}

fn to_json<T: serde::Serialize + ?Sized>(what: &str, value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("could not serialize {what}: {e}");
        "null".to_string()
    })
}

impl DecorRunner {
    pub fn new(config: DecorConfig, page: &str) -> Self {
        let app = DecorApp::new(
            config,
            WebStorage::local(),
            WebStorage::session(),
            Box::new(JsClock),
            page,
        );
        Self {
            app,
            input: InputQueue::new(),
        }
    }

    /// Parse an optional JSON config. Empty or invalid input yields defaults.
    pub fn parse_config(json: &str) -> DecorConfig {
        if json.trim().is_empty() {
            return DecorConfig::default();
        }
        DecorConfig::from_json(json).unwrap_or_else(|e| {
            log::warn!("invalid config, using defaults: {e}");
            DecorConfig::default()
        })
    }

    pub fn init(&mut self) {
        self.app.init();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one animation frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.app.tick(dt, &mut self.input);
    }

    pub fn app(&self) -> &DecorApp<WebStorage> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut DecorApp<WebStorage> {
        &mut self.app
    }

    // ---- Pointer accessors for zero-copy sprite reads ----

    pub fn sprites_ptr(&self) -> *const f32 {
        self.app.render_buffer().instances_ptr()
    }

    pub fn sprite_count(&self) -> u32 {
        self.app.render_buffer().instance_count()
    }

    pub fn viewport_split(&self) -> u32 {
        self.app.render_buffer().viewport_split
    }

    pub fn sprite_stride_floats(&self) -> u32 {
        SpriteInstance::FLOATS as u32
    }

    // ---- JSON views ----

    pub fn take_events_json(&mut self) -> String {
        let events = self.app.take_events();
        to_json("events", &events)
    }

    pub fn take_sounds_json(&mut self) -> String {
        let sounds = self.app.take_sounds();
        to_json("sounds", &sounds)
    }

    /// Elements of the current weather overlay, each with its inline style.
    pub fn weather_elements_json(&self) -> String {
        let elements: Vec<_> = self
            .app
            .weather()
            .elements()
            .iter()
            .map(|el| {
                json!({
                    "text": el.glyph,
                    "css": el.to_css(),
                    "parent": el.parent,
                    "appearAfterMs": el.appear_after_ms,
                    "lifetimeMs": el.lifetime_ms,
                })
            })
            .collect();
        to_json("weather elements", &elements)
    }

    pub fn weather_keyframes_css(&self) -> String {
        self.app.weather().keyframes_css().unwrap_or_default().to_string()
    }

    pub fn progress_view_json(&self) -> String {
        to_json("progress view", &self.app.progress_view())
    }

    pub fn stats_json(&self) -> String {
        to_json("stats", &self.app.stats())
    }

    pub fn glyph_table_json(&self) -> String {
        to_json("glyph table", &GLYPHS)
    }

    pub fn music_json(&self) -> String {
        let music = self.app.music();
        let track = music.current_track();
        let view = json!({
            "index": music.current_index(),
            "name": track.name,
            "artist": track.artist,
            "duration": track.duration_label(),
            "playing": music.is_playing(),
            "volume": music.volume(),
            "bars": music.visualizer().map(|v| v.heights()),
        });
        to_json("music", &view)
    }

    pub fn entrance_schedule_json(&self, count: usize) -> String {
        to_json("entrance schedule", &EntranceSchedule::for_elements(count))
    }

    pub fn cover_progress(&self) -> f32 {
        self.app.transition().cover_progress()
    }

    pub fn loading_opacity(&self) -> f32 {
        self.app.loading_screen().opacity()
    }
}
