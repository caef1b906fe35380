//! wasm-bindgen surface of the decorative effects.
//!
//! The page script calls `decor_init` once, forwards DOM events, calls
//! `decor_tick` from `requestAnimationFrame`, then reads sprites through
//! the pointer accessors and applies `decor_take_events_json`.

pub mod clock;
pub mod runner;
pub mod storage;

pub use clock::JsClock;
pub use runner::DecorRunner;
pub use storage::WebStorage;

use std::cell::RefCell;

use hanabira::{ClickTarget, InputEvent, ThemePreference, WeatherKind};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<DecorRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut DecorRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Decor not initialized. Call decor_init() first.");
        f(runner)
    })
}

/// `config_json` may be empty; `page` is `location.pathname`.
#[wasm_bindgen]
pub fn decor_init(config_json: &str, page: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = DecorRunner::parse_config(config_json);
    let runner = DecorRunner::new(config, page);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });

    with_runner(|r| r.init());
    log::info!("hanabira: initialized");
}

/// Advance one animation frame of `dt` seconds. Drain
/// `decor_take_events_json` and `decor_take_sounds_json` after each call;
/// undrained events beyond `max_pending_events` are dropped oldest first.
#[wasm_bindgen]
pub fn decor_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Input ----

#[wasm_bindgen]
pub fn decor_pointer_move(x: f32, y: f32, touch: bool) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y, touch }));
}

#[wasm_bindgen]
pub fn decor_pointer_down(x: f32, y: f32, touch: bool) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, touch }));
}

/// Flags resolved by the page with `closest('button, a')`,
/// `closest('.secret-box')` and `closest('.accept-btn')`.
#[wasm_bindgen]
pub fn decor_click(interactive: bool, secret: bool, accept: bool) {
    let target = ClickTarget { interactive, secret, accept };
    with_runner(|r| r.push_input(InputEvent::Click { target }));
}

#[wasm_bindgen]
pub fn decor_input() {
    with_runner(|r| r.push_input(InputEvent::Input));
}

#[wasm_bindgen]
pub fn decor_activity() {
    with_runner(|r| r.push_input(InputEvent::Activity));
}

#[wasm_bindgen]
pub fn decor_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

/// Returns true when the page must call `preventDefault()`.
#[wasm_bindgen]
pub fn decor_link_clicked(href: &str, has_target: bool) -> bool {
    with_runner(|r| r.app_mut().link_clicked(href, has_target))
}

#[wasm_bindgen]
pub fn decor_unload() {
    with_runner(|r| r.app_mut().unload());
}

// ---- Controls ----

#[wasm_bindgen]
pub fn decor_set_theme(is_night: bool) {
    with_runner(|r| r.app_mut().set_theme(is_night));
}

/// Returns false for an unknown kind or the current one.
#[wasm_bindgen]
pub fn decor_set_weather(kind: &str) -> bool {
    match WeatherKind::parse(kind) {
        Some(kind) => with_runner(|r| r.app_mut().set_weather(kind)),
        None => {
            log::warn!("unknown weather kind `{kind}`");
            false
        }
    }
}

/// `theme` is `auto`, `day` or `night`. Returns false for anything else.
#[wasm_bindgen]
pub fn decor_set_theme_preference(theme: &str) -> bool {
    match ThemePreference::parse(theme) {
        Some(theme) => {
            with_runner(|r| r.app_mut().set_theme_preference(theme));
            true
        }
        None => {
            log::warn!("unknown theme preference `{theme}`");
            false
        }
    }
}

#[wasm_bindgen]
pub fn decor_set_music_enabled(enabled: bool) {
    with_runner(|r| r.app_mut().set_music_enabled(enabled));
}

#[wasm_bindgen]
pub fn decor_navigate(url: &str) -> bool {
    with_runner(|r| r.app_mut().navigate(url))
}

#[wasm_bindgen]
pub fn decor_toggle_music() {
    with_runner(|r| r.app_mut().toggle_music());
}

#[wasm_bindgen]
pub fn decor_next_track() {
    with_runner(|r| r.app_mut().next_track());
}

#[wasm_bindgen]
pub fn decor_previous_track() {
    with_runner(|r| r.app_mut().previous_track());
}

#[wasm_bindgen]
pub fn decor_track_ended() {
    with_runner(|r| r.app_mut().track_ended());
}

#[wasm_bindgen]
pub fn decor_set_volume(volume: f32) {
    with_runner(|r| r.app_mut().set_volume(volume));
}

#[wasm_bindgen]
pub fn decor_reset_progress() {
    with_runner(|r| r.app_mut().reset_progress());
}

#[wasm_bindgen]
pub fn decor_destroy() {
    with_runner(|r| r.app_mut().destroy());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_sprites_ptr() -> *const f32 {
    with_runner(|r| r.sprites_ptr())
}

#[wasm_bindgen]
pub fn get_sprite_count() -> u32 {
    with_runner(|r| r.sprite_count())
}

#[wasm_bindgen]
pub fn get_viewport_split() -> u32 {
    with_runner(|r| r.viewport_split())
}

#[wasm_bindgen]
pub fn get_sprite_stride_floats() -> u32 {
    with_runner(|r| r.sprite_stride_floats())
}

#[wasm_bindgen]
pub fn get_cover_progress() -> f32 {
    with_runner(|r| r.cover_progress())
}

#[wasm_bindgen]
pub fn get_loading_opacity() -> f32 {
    with_runner(|r| r.loading_opacity())
}

#[wasm_bindgen]
pub fn get_is_night() -> bool {
    with_runner(|r| r.app().is_night())
}

#[wasm_bindgen]
pub fn decor_take_events_json() -> String {
    with_runner(|r| r.take_events_json())
}

#[wasm_bindgen]
pub fn decor_take_sounds_json() -> String {
    with_runner(|r| r.take_sounds_json())
}

#[wasm_bindgen]
pub fn decor_weather_elements_json() -> String {
    with_runner(|r| r.weather_elements_json())
}

#[wasm_bindgen]
pub fn decor_weather_keyframes_css() -> String {
    with_runner(|r| r.weather_keyframes_css())
}

#[wasm_bindgen]
pub fn decor_progress_view_json() -> String {
    with_runner(|r| r.progress_view_json())
}

#[wasm_bindgen]
pub fn decor_stats_json() -> String {
    with_runner(|r| r.stats_json())
}

#[wasm_bindgen]
pub fn decor_music_json() -> String {
    with_runner(|r| r.music_json())
}

#[wasm_bindgen]
pub fn decor_glyph_table_json() -> String {
    with_runner(|r| r.glyph_table_json())
}

#[wasm_bindgen]
pub fn decor_entrance_schedule_json(count: u32) -> String {
    with_runner(|r| r.entrance_schedule_json(count as usize))
}
