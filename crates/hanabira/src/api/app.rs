use crate::api::config::DecorConfig;
use crate::api::types::{DecorEvent, SoundEvent};
use crate::core::clock::Clock;
use crate::core::signal::{Broadcast, SubscriberId, ThemeChange};
use crate::core::time::FixedTimestep;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::instance::RenderBuffer;
use crate::storage::kv::KeyValueStore;
use crate::storage::prefs::{PreferenceStore, Preferences, ThemePreference};
use crate::systems::music::MusicWidget;
use crate::systems::particles::ParticleEngine;
use crate::systems::progress::{ProgressTracker, ProgressView, Stats, MUSIC_LISTENER};
use crate::systems::render::build_render_buffer;
use crate::systems::transition::{LoadingScreen, TearEffect, TransitionController};
use crate::systems::weather::{WeatherKind, WeatherOverlay};

/// Top-level context owning every decorative service.
///
/// Services never look each other up; the app passes the preference store
/// and the theme channel to whoever needs them, and advances everything
/// from one central `tick`.
pub struct DecorApp<S: KeyValueStore> {
    config: DecorConfig,
    clock: Box<dyn Clock>,
    theme: Broadcast<ThemeChange>,
    theme_listener: SubscriberId,
    prefs: PreferenceStore<S>,
    particles: ParticleEngine,
    weather: WeatherOverlay,
    music: MusicWidget,
    progress: ProgressTracker,
    transition: TransitionController,
    loading: LoadingScreen,
    tears: TearEffect,
    timestep: FixedTimestep,
    render_buffer: RenderBuffer,
    events: Vec<DecorEvent>,
    sounds: Vec<SoundEvent>,
    is_night: bool,
    initialized: bool,
}

impl<S: KeyValueStore> DecorApp<S> {
    /// `page` is the current location path; `local` and `session` back the
    /// persistent and per-session stores.
    pub fn new(config: DecorConfig, local: S, session: S, clock: Box<dyn Clock>, page: &str) -> Self {
        let mut theme = Broadcast::new();
        let theme_listener = theme.subscribe();
        let particles = ParticleEngine::new(&config, &mut theme);
        let weather = WeatherOverlay::new(&config, &mut theme);
        let progress = ProgressTracker::new(&config, page);
        let tears = TearEffect::new(progress.page(), config.seed);

        Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            render_buffer: RenderBuffer::with_capacity(config.ambient_count + 64),
            prefs: PreferenceStore::new(local, session),
            music: MusicWidget::new(&config),
            transition: TransitionController::new(&config),
            loading: LoadingScreen::new(),
            particles,
            weather,
            progress,
            tears,
            theme,
            theme_listener,
            clock,
            events: Vec::new(),
            sounds: Vec::new(),
            is_night: false,
            initialized: false,
            config,
        }
    }

    /// Load preferences and start every effect. Call once after construction.
    pub fn init(&mut self) {
        self.prefs.load();
        self.is_night = self.clock.is_night();
        let today = self.clock.today();

        self.particles.spawn(self.config.ambient_count);
        self.particles.set_night(self.is_night);
        self.weather.init(self.is_night, &mut self.events);
        self.progress.init(&mut self.prefs, &today, &mut self.events);
        self.music.init(&mut self.prefs, &mut self.events);
        self.apply_preferences();

        if self.prefs.take_first_load() {
            self.loading.show(self.config.loading_screen_ms, &mut self.events);
        }

        self.build_render_buffer();
        self.initialized = true;
        log::info!(
            "decor: started on {} ({})",
            self.progress.page(),
            if self.is_night { "night" } else { "day" }
        );
    }

    fn apply_preferences(&mut self) {
        let prefs = self.prefs.preferences();
        let night = self.wants_night(prefs.theme_preference);
        let music_enabled = prefs.music_enabled;
        if night {
            self.set_theme(true);
        }
        if !music_enabled {
            self.music.set_volume(0.0, &mut self.prefs, &mut self.events);
        }
    }

    fn wants_night(&self, theme: ThemePreference) -> bool {
        match theme {
            ThemePreference::Night => true,
            ThemePreference::Auto => self.clock.is_night(),
            ThemePreference::Day => false,
        }
    }

    /// Store the visitor's theme choice and switch to it.
    pub fn set_theme_preference(&mut self, theme: ThemePreference) {
        self.prefs.set_theme_preference(theme);
        let night = self.wants_night(theme);
        if night != self.is_night {
            self.set_theme(night);
        }
    }

    /// Store whether music is wanted. Disabling silences the widget.
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.prefs.set_music_enabled(enabled);
        if !enabled {
            self.music.set_volume(0.0, &mut self.prefs, &mut self.events);
        }
    }

    /// Run one frame: apply queued input, advance fixed steps, rebuild sprites.
    ///
    /// Events and sounds queue up until `take_events`/`take_sounds`; a host
    /// drains both once per frame after calling this.
    pub fn tick(&mut self, frame_dt: f32, input: &mut InputQueue) {
        if !self.initialized {
            input.drain();
            return;
        }

        for event in input.drain() {
            self.handle_input(event);
        }

        // Particle integration is capped per frame; timers follow wall-clock time.
        let steps = self.timestep.accumulate(frame_dt);
        let dt_ms = self.timestep.dt_ms() as f32;
        for _ in 0..steps {
            self.particles.step(dt_ms);
        }
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.advance_timers(frame_dt as f64 * 1000.0);
        }
        self.drop_stale_events();

        self.build_render_buffer();
    }

    fn handle_input(&mut self, event: InputEvent) {
        if event.is_activity() {
            self.progress.activity();
        }
        match event {
            InputEvent::PointerMove { x, y, touch } => self.particles.pointer_moved(x, y, touch),
            InputEvent::PointerDown { x, y, .. } => {
                if let Some(sound) = self.particles.burst_at(x, y) {
                    self.sounds.push(sound);
                }
            }
            InputEvent::Click { target } => self.progress.click(target, &mut self.prefs, &mut self.events),
            InputEvent::Input => self.progress.input(&mut self.prefs),
            InputEvent::Activity => {}
            InputEvent::LinkClicked { href, has_target } => {
                self.link_clicked(&href, has_target);
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::Unload => self.unload(),
        }
    }

    fn advance_timers(&mut self, dt_ms: f64) {
        self.weather.tick(dt_ms, &mut self.events);
        self.music.tick(dt_ms, &mut self.prefs, &mut self.events);
        if self.music.has_played_every_track() {
            self.progress.record_achievement(MUSIC_LISTENER, &mut self.prefs, &mut self.events);
        }
        self.progress.tick(dt_ms, &mut self.prefs, &mut self.events);
        self.transition.tick(dt_ms, &mut self.events);
        self.loading.tick(dt_ms, &mut self.events);
        self.tears.tick(dt_ms, &mut self.events);
    }

    fn drop_stale_events(&mut self) {
        let cap = self.config.max_pending_events;
        if self.events.len() > cap {
            let excess = self.events.len() - cap;
            log::warn!("decor: {excess} undrained events dropped");
            self.events.drain(..excess);
        }
        if self.sounds.len() > cap {
            let excess = self.sounds.len() - cap;
            self.sounds.drain(..excess);
        }
    }

    fn build_render_buffer(&mut self) {
        build_render_buffer(&self.particles, &self.transition, &self.music, &mut self.render_buffer);
    }

    /// Publish a theme change and let every subscriber apply it.
    pub fn set_theme(&mut self, is_night: bool) {
        self.theme.publish(ThemeChange { is_night });
        self.particles.sync_theme(&mut self.theme);
        self.weather.sync_theme(&mut self.theme, &mut self.events);
        if let Some(change) = self.theme.drain(self.theme_listener).last() {
            self.is_night = change.is_night;
            self.events.push(DecorEvent::ThemeChanged { is_night: change.is_night });
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.particles.set_viewport(width, height);
        self.music.set_viewport(width, height);
        self.transition.set_viewport(width, height);
    }

    /// Returns true when the host must cancel the link's default navigation.
    pub fn link_clicked(&mut self, href: &str, has_target: bool) -> bool {
        self.transition.link_clicked(href, has_target)
    }

    pub fn navigate(&mut self, url: &str) -> bool {
        self.transition.navigate(url)
    }

    pub fn set_weather(&mut self, kind: WeatherKind) -> bool {
        self.weather.set_weather(kind, &mut self.events)
    }

    pub fn toggle_music(&mut self) {
        self.music.toggle(&mut self.prefs, &mut self.events);
    }

    pub fn next_track(&mut self) {
        self.music.next(&mut self.prefs, &mut self.events);
    }

    pub fn previous_track(&mut self) {
        self.music.previous(&mut self.prefs, &mut self.events);
    }

    pub fn track_ended(&mut self) {
        self.music.track_ended(&mut self.prefs, &mut self.events);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.music.set_volume(volume, &mut self.prefs, &mut self.events);
    }

    /// Flush progress now; the page is going away before the next frame.
    pub fn unload(&mut self) {
        self.progress.unload(&mut self.prefs);
    }

    pub fn reset_progress(&mut self) {
        self.progress.reset(&mut self.prefs, &mut self.events);
    }

    /// Stop every effect. Nothing is saved.
    pub fn destroy(&mut self) {
        self.particles.destroy();
        self.weather.destroy();
        self.music.destroy();
        self.progress.destroy();
        self.transition.destroy();
        self.tears.destroy();
        self.render_buffer.clear();
        self.initialized = false;
        log::info!("decor: destroyed");
    }

    // ---- Per-frame output ----

    /// Events produced since the last call.
    pub fn take_events(&mut self) -> Vec<DecorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sounds produced since the last call.
    pub fn take_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    // ---- Accessors ----

    pub fn config(&self) -> &DecorConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_night(&self) -> bool {
        self.is_night
    }

    pub fn preferences(&self) -> &Preferences {
        self.prefs.preferences()
    }

    pub fn preference_store(&self) -> &PreferenceStore<S> {
        &self.prefs
    }

    pub fn particles(&self) -> &ParticleEngine {
        &self.particles
    }

    pub fn weather(&self) -> &WeatherOverlay {
        &self.weather
    }

    pub fn music(&self) -> &MusicWidget {
        &self.music
    }

    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    pub fn loading_screen(&self) -> &LoadingScreen {
        &self.loading
    }

    pub fn progress_view(&self) -> ProgressView {
        self.progress.view(&self.prefs)
    }

    pub fn stats(&self) -> Stats {
        self.progress.stats(&self.prefs)
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }
}
