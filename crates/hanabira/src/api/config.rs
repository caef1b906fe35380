use serde::Deserialize;

/// Tunables for every effect. All fields default, so a host may pass a
/// partial JSON object (or nothing at all).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    /// Length of one animation step in seconds (one display refresh).
    pub fixed_dt: f32,
    /// Seed for every randomized spawn.
    pub seed: u64,
    /// Viewport size in pixels until the host reports a resize.
    pub viewport_width: f32,
    pub viewport_height: f32,

    /// Ambient blossoms spawned at init.
    pub ambient_count: usize,
    /// Pointer attraction radius, viewport units.
    pub attraction_radius: f32,
    /// Impulse per unit of displacement inside the radius.
    pub attraction_strength: f32,
    /// Particles exiting past `-wrap_margin` or `100 + wrap_margin` re-enter on the other side.
    pub wrap_margin: f32,
    /// Click/tap burst size.
    pub burst_count: usize,
    /// Delay between burst particles, milliseconds.
    pub burst_stagger_ms: f32,
    /// Probability of a trail sparkle per mouse move.
    pub mouse_trail_chance: f32,
    /// Probability of a trail sparkle per touch move.
    pub touch_trail_chance: f32,

    /// Weather re-roll period, milliseconds.
    pub weather_period_ms: f64,

    /// Preference auto-flush period, milliseconds.
    pub autosave_ms: f64,
    /// Active-time check period and activity window, milliseconds.
    pub activity_window_ms: f64,
    /// Delay before the welcome-back toast, milliseconds.
    pub welcome_delay_ms: f64,
    /// Site pages in navigation order.
    pub pages: Vec<String>,

    /// Cover wipe length, milliseconds.
    pub transition_ms: f64,
    /// Loading screen visible time, milliseconds.
    pub loading_screen_ms: f64,

    /// Undrained events kept between `take_events` calls; older ones are dropped.
    pub max_pending_events: usize,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            seed: 42,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            ambient_count: 100,
            attraction_radius: 30.0,
            attraction_strength: 0.001,
            wrap_margin: 10.0,
            burst_count: 15,
            burst_stagger_ms: 30.0,
            mouse_trail_chance: 0.3,
            touch_trail_chance: 0.5,
            weather_period_ms: 5.0 * 60.0 * 1000.0,
            autosave_ms: 30_000.0,
            activity_window_ms: 60_000.0,
            welcome_delay_ms: 2000.0,
            pages: ["index.html", "sorry.html", "third.html", "fourth.html"]
                .into_iter()
                .map(String::from)
                .collect(),
            transition_ms: 600.0,
            loading_screen_ms: 2000.0,
            max_pending_events: 512,
        }
    }
}

impl DecorConfig {
    /// Parse a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = DecorConfig::from_json(r#"{ "ambient_count": 12, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.ambient_count, 12);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.burst_count, 15);
        assert_eq!(cfg.pages.len(), 4);
        assert_eq!(cfg.transition_ms, 600.0);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(DecorConfig::from_json("{}").unwrap(), DecorConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DecorConfig::from_json("{ ambient_count: }").is_err());
    }
}
