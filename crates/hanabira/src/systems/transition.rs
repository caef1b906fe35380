//! Page transitions, the once-per-session loading screen, the entrance
//! schedule and page-specific effects.

use glam::Vec2;
use serde::Serialize;

use crate::api::config::DecorConfig;
use crate::api::types::DecorEvent;
use crate::core::rng::Rng;
use crate::core::timer::{Delay, IntervalTimer};
use crate::extensions::easing::{sample, Easing, Keyframe};
use crate::renderer::glyph::Glyph;

/// Same-site page link: names an `.html` page and is not absolute or protocol-relative.
pub fn is_internal_link(href: &str) -> bool {
    href.contains(".html") && !href.starts_with("http") && !href.starts_with("//")
}

/// Blossom popping over the cover wipe.
#[derive(Debug, Clone)]
pub struct TransitionBlossom {
    /// Client pixels.
    pub pos: Vec2,
    pub size: f32,
    pub delay_ms: f32,
    pub elapsed_ms: f32,
}

impl TransitionBlossom {
    pub const DURATION_MS: f32 = 800.0;
    const TRACK: [Keyframe; 3] = [
        Keyframe::new(0.0, 0.0, 0.0, 0.0),
        Keyframe::new(0.5, 1.5, 180.0, 0.8),
        Keyframe::new(1.0, 0.0, 360.0, 0.0),
    ];

    fn new(viewport: Vec2, delay_ms: f32, rng: &mut Rng) -> Self {
        Self {
            pos: Vec2::new(rng.range(0.0, viewport.x), rng.range(0.0, viewport.y)),
            size: rng.range(15.0, 40.0),
            delay_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn glyph(&self) -> Glyph {
        Glyph::BLOSSOM
    }

    pub fn is_visible(&self) -> bool {
        self.delay_ms <= 0.0
    }

    pub fn frame(&self) -> Keyframe {
        sample(&Self::TRACK, Easing::BackOut.apply(self.elapsed_ms / Self::DURATION_MS))
    }

    fn step(&mut self, dt_ms: f32) -> bool {
        if self.delay_ms > 0.0 {
            self.delay_ms -= dt_ms;
            return true;
        }
        self.elapsed_ms += dt_ms;
        self.elapsed_ms < Self::DURATION_MS
    }
}

#[derive(Debug, Clone)]
struct InFlight {
    url: String,
    elapsed_ms: f64,
    navigated: bool,
}

/// Intercepts same-site navigation and plays the cover wipe first.
///
/// Only one transition runs at a time; once started it stays in flight
/// until the page is replaced.
pub struct TransitionController {
    in_flight: Option<InFlight>,
    duration_ms: f64,
    blossoms: Vec<TransitionBlossom>,
    viewport: Vec2,
    rng: Rng,
    running: bool,
}

impl TransitionController {
    pub const BLOSSOM_COUNT: usize = 20;
    pub const BLOSSOM_STAGGER_MS: f32 = 50.0;

    pub fn new(config: &DecorConfig) -> Self {
        Self {
            in_flight: None,
            duration_ms: config.transition_ms,
            blossoms: Vec::new(),
            viewport: Vec2::new(config.viewport_width, config.viewport_height),
            rng: Rng::new(config.seed.wrapping_add(32_452_843)),
            running: true,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    /// A link was clicked. Returns true when the click was intercepted and
    /// the host must cancel its default navigation.
    pub fn link_clicked(&mut self, href: &str, has_target: bool) -> bool {
        if !self.running || has_target || !is_internal_link(href) {
            return false;
        }
        // A click during a wipe is still swallowed; the first target wins.
        self.navigate(href);
        true
    }

    /// Start a transition to `url`. Ignored while another is in flight.
    pub fn navigate(&mut self, url: &str) -> bool {
        if !self.running || self.in_flight.is_some() {
            log::debug!("transition: ignoring navigation to {url}");
            return false;
        }
        log::info!("transition: navigating to {url}");
        self.in_flight = Some(InFlight {
            url: url.to_string(),
            elapsed_ms: 0.0,
            navigated: false,
        });
        for i in 0..Self::BLOSSOM_COUNT {
            let blossom = TransitionBlossom::new(self.viewport, i as f32 * Self::BLOSSOM_STAGGER_MS, &mut self.rng);
            self.blossoms.push(blossom);
        }
        true
    }

    pub fn tick(&mut self, dt_ms: f64, events: &mut Vec<DecorEvent>) {
        self.blossoms.retain_mut(|b| b.step(dt_ms as f32));
        if let Some(flight) = self.in_flight.as_mut() {
            flight.elapsed_ms += dt_ms;
            if !flight.navigated && flight.elapsed_ms >= self.duration_ms {
                flight.navigated = true;
                events.push(DecorEvent::Navigate { url: flight.url.clone() });
            }
        }
    }

    /// Cover height as a fraction of the viewport, eased.
    pub fn cover_progress(&self) -> f32 {
        match &self.in_flight {
            Some(flight) => Easing::QuintInOut.apply((flight.elapsed_ms / self.duration_ms) as f32),
            None => 0.0,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn blossoms(&self) -> &[TransitionBlossom] {
        &self.blossoms
    }

    pub fn destroy(&mut self) {
        self.running = false;
        self.in_flight = None;
        self.blossoms.clear();
    }
}

// ---- Loading screen ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingPhase {
    Hidden,
    Visible,
    Fading,
}

/// Full-screen loader shown on the first page load of a session.
#[derive(Debug, Clone)]
pub struct LoadingScreen {
    phase: LoadingPhase,
    remaining_ms: f64,
}

impl LoadingScreen {
    pub const FADE_MS: f64 = 500.0;

    pub fn new() -> Self {
        Self {
            phase: LoadingPhase::Hidden,
            remaining_ms: 0.0,
        }
    }

    pub fn show(&mut self, visible_ms: f64, events: &mut Vec<DecorEvent>) {
        self.phase = LoadingPhase::Visible;
        self.remaining_ms = visible_ms;
        events.push(DecorEvent::LoadingScreen { visible: true });
    }

    pub fn tick(&mut self, dt_ms: f64, events: &mut Vec<DecorEvent>) {
        if self.phase == LoadingPhase::Hidden {
            return;
        }
        self.remaining_ms -= dt_ms;
        if self.remaining_ms > 0.0 {
            return;
        }
        match self.phase {
            LoadingPhase::Visible => {
                self.phase = LoadingPhase::Fading;
                self.remaining_ms += Self::FADE_MS;
                events.push(DecorEvent::LoadingScreen { visible: false });
            }
            _ => {
                self.phase = LoadingPhase::Hidden;
                self.remaining_ms = 0.0;
            }
        }
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    pub fn opacity(&self) -> f32 {
        match self.phase {
            LoadingPhase::Hidden => 0.0,
            LoadingPhase::Visible => 1.0,
            LoadingPhase::Fading => (self.remaining_ms / Self::FADE_MS).clamp(0.0, 1.0) as f32,
        }
    }
}

impl Default for LoadingScreen {
    fn default() -> Self {
        Self::new()
    }
}

// ---- Entrance ----

/// Reveal delays for the page's cards, buttons and titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceSchedule {
    pub element_delays_ms: Vec<u32>,
    pub container_delay_ms: u32,
}

impl EntranceSchedule {
    pub const CONTAINER_DELAY_MS: u32 = 300;

    pub fn for_elements(count: usize) -> Self {
        Self {
            element_delays_ms: (0..count as u32).map(|i| 100 + 100 * i).collect(),
            container_delay_ms: Self::CONTAINER_DELAY_MS,
        }
    }
}

// ---- Tears ----

/// Tear drops falling on the apology page.
pub struct TearEffect {
    start: Delay,
    interval: Option<IntervalTimer>,
    rng: Rng,
}

impl TearEffect {
    pub const PAGE: &'static str = "sorry.html";
    pub const LIFETIME_MS: u32 = 3000;
    const START_MS: f64 = 1000.0;
    const PERIOD_MS: f64 = 2000.0;

    /// Armed only on the apology page.
    pub fn new(page: &str, seed: u64) -> Self {
        let start = if page == Self::PAGE { Delay::after(Self::START_MS) } else { Delay::idle() };
        Self {
            start,
            interval: None,
            rng: Rng::new(seed.wrapping_add(49_979_687)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_pending() || self.interval.as_ref().is_some_and(|t| t.is_active())
    }

    pub fn tick(&mut self, dt_ms: f64, events: &mut Vec<DecorEvent>) {
        if self.start.tick(dt_ms) {
            self.interval = Some(IntervalTimer::new(Self::PERIOD_MS));
            return;
        }
        let fired = match self.interval.as_mut() {
            Some(timer) => timer.tick(dt_ms),
            None => 0,
        };
        for _ in 0..fired {
            let css = self.tear_css();
            events.push(DecorEvent::Tear { css, lifetime_ms: Self::LIFETIME_MS });
        }
    }

    fn tear_css(&mut self) -> String {
        format!(
            "position: fixed; width: {}px; height: {}px; left: {}vw; top: -20px; \
             background: linear-gradient(to bottom, rgba(160, 210, 255, 0.9), rgba(110, 181, 255, 0.6)); \
             border-radius: 50%; animation: tearFall {}s linear; z-index: -1; pointer-events: none;",
            self.rng.range(3.0, 9.0),
            self.rng.range(8.0, 20.0),
            self.rng.range(0.0, 100.0),
            self.rng.range(1.0, 3.0),
        )
    }

    pub fn destroy(&mut self) {
        self.start.cancel();
        self.interval = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f64 = 1000.0 / 60.0;

    fn navigations(events: &[DecorEvent]) -> usize {
        events.iter().filter(|e| matches!(e, DecorEvent::Navigate { .. })).count()
    }

    #[test]
    fn internal_links() {
        assert!(is_internal_link("sorry.html"));
        assert!(is_internal_link("./third.html#top"));
        assert!(!is_internal_link("https://example.com/page.html"));
        assert!(!is_internal_link("//cdn.example.com/a.html"));
        assert!(!is_internal_link("mailto:someone@example.com"));
        assert!(!is_internal_link("/about"));
    }

    #[test]
    fn links_with_target_are_not_intercepted() {
        let mut t = TransitionController::new(&DecorConfig::default());
        assert!(!t.link_clicked("sorry.html", true));
        assert!(!t.is_transitioning());
        assert!(t.link_clicked("sorry.html", false));
        assert!(t.is_transitioning());
    }

    #[test]
    fn destroyed_controller_lets_links_through() {
        let mut t = TransitionController::new(&DecorConfig::default());
        t.destroy();
        assert!(!t.link_clicked("sorry.html", false));
        assert!(!t.is_transitioning());
    }

    #[test]
    fn link_during_wipe_is_swallowed() {
        let mut t = TransitionController::new(&DecorConfig::default());
        assert!(t.link_clicked("sorry.html", false));
        assert!(t.link_clicked("third.html", false));
        let mut events = Vec::new();
        t.tick(600.0, &mut events);
        assert_eq!(events, vec![DecorEvent::Navigate { url: "sorry.html".into() }]);
    }

    #[test]
    fn navigation_fires_after_cover_wipe() {
        let mut t = TransitionController::new(&DecorConfig::default());
        let mut events = Vec::new();
        t.navigate("third.html");
        t.tick(599.0, &mut events);
        assert_eq!(navigations(&events), 0);
        assert!(t.cover_progress() > 0.9);
        t.tick(1.0, &mut events);
        assert_eq!(events, vec![DecorEvent::Navigate { url: "third.html".into() }]);
        assert_eq!(t.cover_progress(), 1.0);
    }

    #[test]
    fn second_navigation_in_flight_is_ignored() {
        let mut t = TransitionController::new(&DecorConfig::default());
        let mut events = Vec::new();
        assert!(t.navigate("sorry.html"));
        t.tick(300.0, &mut events);
        assert!(!t.navigate("fourth.html"));
        for _ in 0..120 {
            t.tick(STEP, &mut events);
        }
        assert_eq!(events, vec![DecorEvent::Navigate { url: "sorry.html".into() }]);
    }

    #[test]
    fn blossoms_stagger_and_expire() {
        let mut t = TransitionController::new(&DecorConfig::default());
        let mut events = Vec::new();
        t.navigate("sorry.html");
        assert_eq!(t.blossoms().len(), 20);
        t.tick(STEP, &mut events);
        assert_eq!(t.blossoms().iter().filter(|b| b.is_visible()).count(), 1);
        let mut elapsed = 0.0;
        while elapsed < 19.0 * 50.0 + 800.0 + 2.0 * STEP {
            t.tick(STEP, &mut events);
            elapsed += STEP;
        }
        assert!(t.blossoms().is_empty());
    }

    #[test]
    fn blossom_peaks_mid_animation() {
        let mut rng = Rng::new(1);
        let mut b = TransitionBlossom::new(Vec2::new(100.0, 100.0), 0.0, &mut rng);
        assert_eq!(b.frame().scale, 0.0);
        b.elapsed_ms = TransitionBlossom::DURATION_MS;
        let end = b.frame();
        assert_eq!(end.scale, 0.0);
        assert_eq!(end.rotation, 360.0);
    }

    #[test]
    fn loading_screen_shows_then_fades() {
        let mut screen = LoadingScreen::new();
        let mut events = Vec::new();
        screen.show(2000.0, &mut events);
        assert_eq!(screen.phase(), LoadingPhase::Visible);
        screen.tick(1999.0, &mut events);
        assert_eq!(screen.opacity(), 1.0);
        screen.tick(1.0, &mut events);
        assert_eq!(screen.phase(), LoadingPhase::Fading);
        assert_eq!(
            events,
            vec![
                DecorEvent::LoadingScreen { visible: true },
                DecorEvent::LoadingScreen { visible: false }
            ]
        );
        screen.tick(250.0, &mut events);
        assert!((screen.opacity() - 0.5).abs() < 1e-6);
        screen.tick(250.0, &mut events);
        assert_eq!(screen.phase(), LoadingPhase::Hidden);
    }

    #[test]
    fn entrance_delays() {
        let s = EntranceSchedule::for_elements(3);
        assert_eq!(s.element_delays_ms, vec![100, 200, 300]);
        assert_eq!(s.container_delay_ms, 300);
    }

    #[test]
    fn tears_only_on_apology_page() {
        let mut elsewhere = TearEffect::new("index.html", 1);
        assert!(!elsewhere.is_active());
        let mut events = Vec::new();
        elsewhere.tick(10_000.0, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn tears_start_after_a_second_then_every_two() {
        let mut tears = TearEffect::new("sorry.html", 1);
        let mut events = Vec::new();
        tears.tick(1000.0, &mut events);
        assert!(events.is_empty());
        tears.tick(2000.0, &mut events);
        tears.tick(2000.0, &mut events);
        assert_eq!(events.len(), 2);
        match &events[0] {
            DecorEvent::Tear { css, lifetime_ms } => {
                assert_eq!(*lifetime_ms, 3000);
                assert!(css.contains("animation: tearFall"));
            }
            other => panic!("unexpected {other:?}"),
        }
        tears.destroy();
        tears.tick(10_000.0, &mut events);
        assert_eq!(events.len(), 2);
    }
}
