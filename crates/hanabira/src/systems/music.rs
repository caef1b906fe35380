//! Background music widget: playlist control, visualizer bars and floating notes.
//!
//! No audio is decoded here. The widget tracks the playlist position and a
//! simulated playhead, mirrors volume and play state into the preference
//! store, and publishes events the host uses to drive its media element.

use glam::Vec2;

use crate::api::config::DecorConfig;
use crate::api::types::DecorEvent;
use crate::core::rng::Rng;
use crate::core::timer::{Delay, IntervalTimer};
use crate::extensions::easing::{sample, Easing, Keyframe};
use crate::renderer::glyph::{self, Glyph};
use crate::storage::kv::KeyValueStore;
use crate::storage::prefs::{PlayState, PreferenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub name: &'static str,
    pub artist: &'static str,
    pub duration_s: u32,
}

impl Track {
    /// `m:ss`.
    pub fn duration_label(&self) -> String {
        format!("{}:{:02}", self.duration_s / 60, self.duration_s % 60)
    }
}

pub const TRACK_COUNT: usize = 5;

pub const PLAYLIST: [Track; TRACK_COUNT] = [
    Track { name: "Spring of Life", artist: "Perfume", duration_s: 240 },
    Track { name: "Sparkle", artist: "RADWIMPS", duration_s: 296 },
    Track { name: "Nandemonaiya", artist: "RADWIMPS", duration_s: 344 },
    Track { name: "Katawaredoki", artist: "RADWIMPS", duration_s: 170 },
    Track { name: "Zenzenzense", artist: "RADWIMPS", duration_s: 285 },
];

pub const DEFAULT_VOLUME: f32 = 0.3;
const AUTOPLAY_DELAY_MS: f64 = 1000.0;
const RESUME_DELAY_MS: f64 = 100.0;

// ---- Visualizer ----

#[derive(Debug, Clone)]
struct Bar {
    height: f32,
    refresh: IntervalTimer,
}

/// Equalizer-style bars. Bar i re-rolls its height every `100 + 10 * i` ms.
#[derive(Debug, Clone)]
pub struct Visualizer {
    bars: Vec<Bar>,
}

impl Visualizer {
    pub const BAR_COUNT: usize = 40;
    pub const MIN_HEIGHT: f32 = 10.0;
    pub const MAX_HEIGHT: f32 = 60.0;

    fn new(rng: &mut Rng) -> Self {
        let bars = (0..Self::BAR_COUNT)
            .map(|i| Bar {
                height: rng.range(Self::MIN_HEIGHT, Self::MAX_HEIGHT),
                refresh: IntervalTimer::new(100.0 + 10.0 * i as f64),
            })
            .collect();
        Self { bars }
    }

    fn tick(&mut self, dt_ms: f64, playing: bool, rng: &mut Rng) {
        for bar in &mut self.bars {
            if bar.refresh.tick(dt_ms) > 0 && playing {
                bar.height = rng.range(Self::MIN_HEIGHT, Self::MAX_HEIGHT);
            }
        }
    }

    /// Bar heights in pixels, left to right.
    pub fn heights(&self) -> Vec<f32> {
        self.bars.iter().map(|b| b.height).collect()
    }
}

// ---- Notes ----

/// A note glyph rising from the bottom edge.
#[derive(Debug, Clone)]
pub struct MusicNote {
    /// Start position, client pixels.
    pub pos: Vec2,
    pub size: f32,
    pub glyph: Glyph,
    pub duration_ms: f32,
    pub elapsed_ms: f32,
}

impl MusicNote {
    const TRACK: [Keyframe; 3] = [
        Keyframe::new(0.0, 1.0, 0.0, 0.0),
        Keyframe::new(0.5, 1.2, 0.0, 0.8).with_rise(-100.0),
        Keyframe::new(1.0, 0.5, 0.0, 0.0).with_rise(-300.0),
    ];

    fn new(viewport: Vec2, rng: &mut Rng) -> Self {
        Self {
            pos: Vec2::new(rng.range(0.0, viewport.x), viewport.y),
            size: rng.range(20.0, 50.0),
            glyph: rng.pick(&glyph::NOTES).copied().unwrap_or(Glyph(14)),
            duration_ms: rng.range(2000.0, 5000.0),
            elapsed_ms: 0.0,
        }
    }

    pub fn frame(&self) -> Keyframe {
        sample(&Self::TRACK, Easing::CubicOut.apply(self.elapsed_ms / self.duration_ms))
    }

    fn step(&mut self, dt_ms: f32) -> bool {
        self.elapsed_ms += dt_ms;
        self.elapsed_ms < self.duration_ms
    }
}

// ---- Widget ----

pub struct MusicWidget {
    index: usize,
    playing: bool,
    volume: f32,
    /// Simulated playhead within the current track.
    position_ms: f64,
    autoplay: Delay,
    resume: Delay,
    next_note: Delay,
    visualizer: Option<Visualizer>,
    notes: Vec<MusicNote>,
    played: [bool; TRACK_COUNT],
    viewport: Vec2,
    rng: Rng,
    running: bool,
}

impl MusicWidget {
    pub fn new(config: &DecorConfig) -> Self {
        Self {
            index: 0,
            playing: false,
            volume: DEFAULT_VOLUME,
            position_ms: 0.0,
            autoplay: Delay::idle(),
            resume: Delay::idle(),
            next_note: Delay::idle(),
            visualizer: None,
            notes: Vec::new(),
            played: [false; TRACK_COUNT],
            viewport: Vec2::new(config.viewport_width, config.viewport_height),
            rng: Rng::new(config.seed.wrapping_add(15_485_863)),
            running: true,
        }
    }

    /// Load the first track, restore the saved volume and schedule autoplay.
    pub fn init<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>, events: &mut Vec<DecorEvent>) {
        self.push_track(events);
        if let Some(volume) = prefs.stored_volume() {
            self.set_volume(volume, prefs, events);
        }
        if prefs.stored_play_state() == Some(PlayState::Playing) {
            self.autoplay.arm(AUTOPLAY_DELAY_MS);
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn toggle<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>, events: &mut Vec<DecorEvent>) {
        if self.playing {
            self.resume.cancel();
            self.pause(prefs, events);
        } else {
            self.play(prefs, events);
        }
    }

    pub fn next<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>, events: &mut Vec<DecorEvent>) {
        let index = (self.index + 1) % PLAYLIST.len();
        self.load_track(index, prefs, events);
    }

    pub fn previous<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>, events: &mut Vec<DecorEvent>) {
        let index = (self.index + PLAYLIST.len() - 1) % PLAYLIST.len();
        self.load_track(index, prefs, events);
    }

    /// The current track finished; advance.
    pub fn track_ended<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>, events: &mut Vec<DecorEvent>) {
        self.next(prefs, events);
    }

    /// Set the volume, clamped to [0, 1]. Non-finite values are ignored.
    pub fn set_volume<S: KeyValueStore>(
        &mut self,
        volume: f32,
        prefs: &mut PreferenceStore<S>,
        events: &mut Vec<DecorEvent>,
    ) {
        if !volume.is_finite() {
            log::warn!("music: ignoring volume {volume}");
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        prefs.set_volume(self.volume);
        events.push(DecorEvent::Volume { volume: self.volume });
    }

    pub fn tick<S: KeyValueStore>(
        &mut self,
        dt_ms: f64,
        prefs: &mut PreferenceStore<S>,
        events: &mut Vec<DecorEvent>,
    ) {
        if !self.running {
            return;
        }
        if self.autoplay.tick(dt_ms) && !self.playing {
            self.play(prefs, events);
        }
        if self.resume.tick(dt_ms) && !self.playing {
            self.play(prefs, events);
        }

        if self.playing {
            self.position_ms += dt_ms;
            if self.position_ms >= PLAYLIST[self.index].duration_s as f64 * 1000.0 {
                self.track_ended(prefs, events);
            }
        }

        let playing = self.playing;
        if let Some(vis) = self.visualizer.as_mut() {
            vis.tick(dt_ms, playing, &mut self.rng);
        }

        self.notes.retain_mut(|n| n.step(dt_ms as f32));
        if self.next_note.tick(dt_ms) && self.playing {
            self.spawn_note();
        }
    }

    /// Stop playback and drop the visualizer and notes. Storage is left alone.
    pub fn destroy(&mut self) {
        self.running = false;
        self.playing = false;
        self.autoplay.cancel();
        self.resume.cancel();
        self.next_note.cancel();
        self.visualizer = None;
        self.notes.clear();
    }

    fn play<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>, events: &mut Vec<DecorEvent>) {
        if !self.running {
            return;
        }
        self.playing = true;
        self.played[self.index] = true;
        self.visualizer = Some(Visualizer::new(&mut self.rng));
        self.spawn_note();
        prefs.set_play_state(PlayState::Playing);
        events.push(DecorEvent::Playback { playing: true });
        log::info!("music: playing {}", PLAYLIST[self.index].name);
    }

    fn pause<S: KeyValueStore>(&mut self, prefs: &mut PreferenceStore<S>, events: &mut Vec<DecorEvent>) {
        self.playing = false;
        self.next_note.cancel();
        prefs.set_play_state(PlayState::Paused);
        events.push(DecorEvent::Playback { playing: false });
    }

    /// Switch tracks. A playing widget pauses now and resumes shortly after.
    fn load_track<S: KeyValueStore>(
        &mut self,
        index: usize,
        prefs: &mut PreferenceStore<S>,
        events: &mut Vec<DecorEvent>,
    ) {
        self.index = index;
        self.position_ms = 0.0;
        self.push_track(events);
        if self.playing {
            self.pause(prefs, events);
            self.resume.arm(RESUME_DELAY_MS);
        }
    }

    fn push_track(&self, events: &mut Vec<DecorEvent>) {
        let track = &PLAYLIST[self.index];
        events.push(DecorEvent::TrackChanged {
            index: self.index,
            name: track.name,
            artist: track.artist,
        });
    }

    fn spawn_note(&mut self) {
        let note = MusicNote::new(self.viewport, &mut self.rng);
        self.notes.push(note);
        let wait = self.rng.range(500.0, 1500.0);
        self.next_note.arm(wait as f64);
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_track(&self) -> &'static Track {
        &PLAYLIST[self.index]
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn position_ms(&self) -> f64 {
        self.position_ms
    }

    pub fn visualizer(&self) -> Option<&Visualizer> {
        self.visualizer.as_ref()
    }

    pub fn notes(&self) -> &[MusicNote] {
        &self.notes
    }

    /// True once every playlist track has started playing at least once.
    pub fn has_played_every_track(&self) -> bool {
        self.played.iter().all(|p| *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;
    use crate::storage::prefs::{PLAY_STATE_KEY, VOLUME_KEY};

    const STEP: f64 = 1000.0 / 60.0;

    fn setup() -> (MusicWidget, PreferenceStore<MemoryStore>, Vec<DecorEvent>) {
        let prefs = PreferenceStore::new(MemoryStore::new(), MemoryStore::new());
        (MusicWidget::new(&DecorConfig::default()), prefs, Vec::new())
    }

    fn run(w: &mut MusicWidget, prefs: &mut PreferenceStore<MemoryStore>, events: &mut Vec<DecorEvent>, ms: f64) {
        let mut t = 0.0;
        while t < ms {
            w.tick(STEP, prefs, events);
            t += STEP;
        }
    }

    #[test]
    fn duration_labels() {
        assert_eq!(PLAYLIST[0].duration_label(), "4:00");
        assert_eq!(PLAYLIST[3].duration_label(), "2:50");
    }

    #[test]
    fn toggle_mirrors_play_state() {
        let (mut w, mut prefs, mut events) = setup();
        w.toggle(&mut prefs, &mut events);
        assert!(w.is_playing());
        assert_eq!(prefs.stored_play_state(), Some(PlayState::Playing));
        w.toggle(&mut prefs, &mut events);
        assert!(!w.is_playing());
        assert_eq!(prefs.local().get(PLAY_STATE_KEY).unwrap().as_deref(), Some("paused"));
    }

    #[test]
    fn volume_is_clamped_and_persisted() {
        let (mut w, mut prefs, mut events) = setup();
        w.set_volume(1.7, &mut prefs, &mut events);
        assert_eq!(w.volume(), 1.0);
        w.set_volume(-0.2, &mut prefs, &mut events);
        assert_eq!(w.volume(), 0.0);
        assert_eq!(prefs.stored_volume(), Some(0.0));
        w.set_volume(f32::NAN, &mut prefs, &mut events);
        assert_eq!(w.volume(), 0.0);
    }

    #[test]
    fn init_restores_volume_and_autoplays() {
        let local = MemoryStore::new()
            .with_entry(VOLUME_KEY, "0.8")
            .with_entry(PLAY_STATE_KEY, "playing");
        let mut prefs = PreferenceStore::new(local, MemoryStore::new());
        let mut w = MusicWidget::new(&DecorConfig::default());
        let mut events = Vec::new();
        w.init(&mut prefs, &mut events);
        assert_eq!(w.volume(), 0.8);
        assert!(!w.is_playing());
        run(&mut w, &mut prefs, &mut events, 1000.0 + STEP);
        assert!(w.is_playing());
    }

    #[test]
    fn track_change_while_playing_pauses_then_resumes() {
        let (mut w, mut prefs, mut events) = setup();
        w.toggle(&mut prefs, &mut events);
        w.next(&mut prefs, &mut events);
        assert_eq!(w.current_index(), 1);
        assert!(!w.is_playing());
        run(&mut w, &mut prefs, &mut events, 100.0 + STEP);
        assert!(w.is_playing());
    }

    #[test]
    fn track_change_while_paused_stays_paused() {
        let (mut w, mut prefs, mut events) = setup();
        w.previous(&mut prefs, &mut events);
        assert_eq!(w.current_index(), PLAYLIST.len() - 1);
        run(&mut w, &mut prefs, &mut events, 500.0);
        assert!(!w.is_playing());
    }

    #[test]
    fn playhead_end_advances_track() {
        let (mut w, mut prefs, mut events) = setup();
        w.next(&mut prefs, &mut events);
        w.next(&mut prefs, &mut events);
        w.next(&mut prefs, &mut events);
        assert_eq!(w.current_track().name, "Katawaredoki");
        w.toggle(&mut prefs, &mut events);
        w.tick(170_000.0, &mut prefs, &mut events);
        assert_eq!(w.current_index(), 4);
    }

    #[test]
    fn visualizer_has_forty_bounded_bars() {
        let (mut w, mut prefs, mut events) = setup();
        w.toggle(&mut prefs, &mut events);
        run(&mut w, &mut prefs, &mut events, 2000.0);
        let heights = w.visualizer().map(|v| v.heights()).unwrap_or_default();
        assert_eq!(heights.len(), Visualizer::BAR_COUNT);
        assert!(heights.iter().all(|h| (10.0..60.0).contains(h)));
    }

    #[test]
    fn notes_spawn_only_while_playing_and_expire() {
        let (mut w, mut prefs, mut events) = setup();
        run(&mut w, &mut prefs, &mut events, 3000.0);
        assert!(w.notes().is_empty());
        w.toggle(&mut prefs, &mut events);
        run(&mut w, &mut prefs, &mut events, 3000.0);
        assert!(w.notes().len() >= 2);
        w.toggle(&mut prefs, &mut events);
        run(&mut w, &mut prefs, &mut events, 5100.0);
        assert!(w.notes().is_empty());
    }

    #[test]
    fn note_rises_and_fades() {
        let mut rng = Rng::new(3);
        let mut n = MusicNote::new(Vec2::new(800.0, 600.0), &mut rng);
        assert_eq!(n.pos.y, 600.0);
        assert_eq!(n.frame().opacity, 0.0);
        n.elapsed_ms = n.duration_ms;
        let end = n.frame();
        assert_eq!(end.rise, -300.0);
        assert_eq!(end.scale, 0.5);
    }

    #[test]
    fn every_track_played_is_tracked() {
        let (mut w, mut prefs, mut events) = setup();
        w.toggle(&mut prefs, &mut events);
        for _ in 0..PLAYLIST.len() - 1 {
            assert!(!w.has_played_every_track());
            w.next(&mut prefs, &mut events);
            run(&mut w, &mut prefs, &mut events, 150.0);
        }
        assert!(w.has_played_every_track());
    }

    #[test]
    fn destroy_stops_playback() {
        let (mut w, mut prefs, mut events) = setup();
        w.toggle(&mut prefs, &mut events);
        w.destroy();
        assert!(!w.is_playing());
        assert!(w.visualizer().is_none());
        w.toggle(&mut prefs, &mut events);
        assert!(!w.is_playing());
    }
}
