//! Weather overlay: declarative, CSS-animated scenery regenerated per weather kind.
//!
//! Once generated, elements carry their own animation timing and need no
//! per-frame work. The overlay only re-rolls its kind on a timer and
//! rebuilds on theme changes.

use std::fmt::Write as _;

use serde::Serialize;

use crate::api::config::DecorConfig;
use crate::api::types::{DecorEvent, Notification};
use crate::core::rng::Rng;
use crate::core::signal::{Broadcast, SubscriberId, ThemeChange};
use crate::core::timer::IntervalTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherKind {
    CherryBlossom,
    Sunny,
    LightRain,
    Snow,
    AutumnLeaves,
    StarryNight,
    Moonlight,
    MeteorShower,
}

/// Kinds rolled during the day.
pub const DAY_SET: [WeatherKind; 5] = [
    WeatherKind::CherryBlossom,
    WeatherKind::Sunny,
    WeatherKind::LightRain,
    WeatherKind::Snow,
    WeatherKind::AutumnLeaves,
];

/// Kinds rolled at night.
pub const NIGHT_SET: [WeatherKind; 3] = [
    WeatherKind::StarryNight,
    WeatherKind::Moonlight,
    WeatherKind::MeteorShower,
];

impl WeatherKind {
    pub const ALL: [WeatherKind; 8] = [
        WeatherKind::CherryBlossom,
        WeatherKind::Sunny,
        WeatherKind::LightRain,
        WeatherKind::Snow,
        WeatherKind::AutumnLeaves,
        WeatherKind::StarryNight,
        WeatherKind::Moonlight,
        WeatherKind::MeteorShower,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherKind::CherryBlossom => "cherry-blossom",
            WeatherKind::Sunny => "sunny",
            WeatherKind::LightRain => "light-rain",
            WeatherKind::Snow => "snow",
            WeatherKind::AutumnLeaves => "autumn-leaves",
            WeatherKind::StarryNight => "starry-night",
            WeatherKind::Moonlight => "moonlight",
            WeatherKind::MeteorShower => "meteor-shower",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Human label used in the change notification.
    pub fn label(self) -> &'static str {
        match self {
            WeatherKind::CherryBlossom => "🌸 Cherry Blossoms",
            WeatherKind::Sunny => "☀️ Sunny Day",
            WeatherKind::LightRain => "🌧️ Light Rain",
            WeatherKind::Snow => "❄️ Snowfall",
            WeatherKind::AutumnLeaves => "🍂 Autumn Leaves",
            WeatherKind::StarryNight => "🌌 Starry Night",
            WeatherKind::Moonlight => "🌙 Moonlight",
            WeatherKind::MeteorShower => "☄️ Meteor Shower",
        }
    }

    pub fn is_night_kind(self) -> bool {
        NIGHT_SET.contains(&self)
    }
}

/// The set a re-roll draws from.
pub fn active_set(is_night: bool) -> &'static [WeatherKind] {
    if is_night {
        &NIGHT_SET
    } else {
        &DAY_SET
    }
}

/// Uniform draw from the day or night set.
pub fn pick_kind(is_night: bool, rng: &mut Rng) -> WeatherKind {
    rng.pick(active_set(is_night))
        .copied()
        .unwrap_or(WeatherKind::CherryBlossom)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherState {
    pub kind: WeatherKind,
    pub is_night: bool,
}

// ---- Elements ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Length {
    Px(f32),
    Vw(f32),
    Vh(f32),
    Percent(f32),
}

impl Length {
    fn css(self) -> String {
        match self {
            Length::Px(v) => format!("{v}px"),
            Length::Vw(v) => format!("{v}vw"),
            Length::Vh(v) => format!("{v}vh"),
            Length::Percent(v) => format!("{v}%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Glyph,
    Beam,
    Drop,
    Star,
    Moon,
    Crater,
    Meteor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    Once,
    Infinite,
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Animation {
    pub name: &'static str,
    pub duration_s: f32,
    pub delay_s: f32,
    pub timing: &'static str,
    pub repeat: Repeat,
}

impl Animation {
    fn css(&self) -> String {
        let repeat = match self.repeat {
            Repeat::Once => "",
            Repeat::Infinite => " infinite",
            Repeat::Alternate => " infinite alternate",
        };
        format!(
            "animation: {} {}s {}{}; animation-delay: {}s;",
            self.name, self.duration_s, self.timing, repeat, self.delay_s
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    Brightness(f32),
    Blur(f32),
}

/// One overlay element, fully described up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherElement {
    pub shape: Shape,
    pub glyph: Option<&'static str>,
    pub left: Option<Length>,
    pub right: Option<Length>,
    pub top: Length,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub font_size: Option<f32>,
    pub opacity: Option<f32>,
    pub rotation: Option<f32>,
    pub filter: Option<Filter>,
    pub animation: Option<Animation>,
    /// Index of the element this one is nested in.
    pub parent: Option<usize>,
    /// The host inserts the element only after this long.
    pub appear_after_ms: u32,
    /// The host removes the element this long after inserting it.
    pub lifetime_ms: Option<u32>,
}

impl WeatherElement {
    fn new(shape: Shape, top: Length) -> Self {
        Self {
            shape,
            glyph: None,
            left: None,
            right: None,
            top,
            width: None,
            height: None,
            font_size: None,
            opacity: None,
            rotation: None,
            filter: None,
            animation: None,
            parent: None,
            appear_after_ms: 0,
            lifetime_ms: None,
        }
    }

    /// Inline style declaration for the element.
    pub fn to_css(&self) -> String {
        let mut css = String::from("position: absolute;");
        if let Some(left) = self.left {
            let _ = write!(css, " left: {};", left.css());
        }
        if let Some(right) = self.right {
            let _ = write!(css, " right: {};", right.css());
        }
        let _ = write!(css, " top: {};", self.top.css());
        if let Some(w) = self.width {
            let _ = write!(css, " width: {};", w.css());
        }
        if let Some(h) = self.height {
            let _ = write!(css, " height: {};", h.css());
        }
        if let Some(size) = self.font_size {
            let _ = write!(css, " font-size: {size}px;");
        }
        if let Some(opacity) = self.opacity {
            let _ = write!(css, " opacity: {opacity};");
        }
        if let Some(deg) = self.rotation {
            let _ = write!(css, " transform: rotate({deg}deg);");
        }
        match self.shape {
            Shape::Glyph => {}
            Shape::Beam => css.push_str(
                " background: linear-gradient(to bottom, transparent, rgba(255, 255, 200, 0.3), transparent);",
            ),
            Shape::Drop => css.push_str(
                " background: linear-gradient(to bottom, transparent, rgba(160, 210, 255, 0.7));",
            ),
            Shape::Star => css.push_str(" background: white; border-radius: 50%;"),
            Shape::Moon => css.push_str(
                " background: radial-gradient(circle at 30% 30%, #fff, #f0f0f0); border-radius: 50%; box-shadow: 0 0 40px rgba(255, 255, 255, 0.5);",
            ),
            Shape::Crater => css.push_str(" background: rgba(200, 200, 200, 0.3); border-radius: 50%;"),
            Shape::Meteor => css.push_str(
                " background: linear-gradient(to bottom, transparent, white, transparent); box-shadow: 0 0 10px white;",
            ),
        }
        match self.filter {
            Some(Filter::Brightness(b)) => {
                let _ = write!(css, " filter: brightness({b});");
            }
            Some(Filter::Blur(px)) => {
                let _ = write!(css, " filter: blur({px}px);");
            }
            None => {}
        }
        if let Some(anim) = &self.animation {
            css.push(' ');
            css.push_str(&anim.css());
        }
        css
    }
}

fn falling_glyph(
    rng: &mut Rng,
    glyph: &'static str,
    size: (f32, f32),
    opacity: (f32, f32),
    anim: &'static str,
    duration: (f32, f32),
) -> WeatherElement {
    let mut el = WeatherElement::new(Shape::Glyph, Length::Px(-50.0));
    el.glyph = Some(glyph);
    el.font_size = Some(rng.range(size.0, size.1));
    el.left = Some(Length::Vw(rng.range(0.0, 100.0)));
    el.opacity = Some(rng.range(opacity.0, opacity.1));
    el.animation = Some(Animation {
        name: anim,
        duration_s: rng.range(duration.0, duration.1),
        delay_s: rng.range(0.0, 5.0),
        timing: "linear",
        repeat: Repeat::Infinite,
    });
    el
}

/// Build the element list for a kind.
pub fn generate(kind: WeatherKind, is_night: bool, rng: &mut Rng) -> Vec<WeatherElement> {
    match kind {
        WeatherKind::CherryBlossom => (0..50)
            .map(|_| {
                let mut el = falling_glyph(rng, "🌸", (15.0, 40.0), (0.2, 0.8), "fallBlossom", (10.0, 20.0));
                if is_night {
                    el.filter = Some(Filter::Brightness(0.8));
                }
                el
            })
            .collect(),
        WeatherKind::Sunny => (0..5)
            .map(|i| {
                let mut el = WeatherElement::new(Shape::Beam, Length::Px(0.0));
                el.left = Some(Length::Percent(20.0 + i as f32 * 15.0));
                el.width = Some(Length::Px(2.0));
                el.height = Some(Length::Percent(100.0));
                el.rotation = Some(i as f32 * 10.0 - 20.0);
                el.animation = Some(Animation {
                    name: "sunbeam",
                    duration_s: 8.0,
                    delay_s: i as f32,
                    timing: "ease-in-out",
                    repeat: Repeat::Infinite,
                });
                el
            })
            .collect(),
        WeatherKind::LightRain => (0..100)
            .map(|_| {
                let mut el = WeatherElement::new(Shape::Drop, Length::Px(-50.0));
                el.width = Some(Length::Px(1.0));
                el.height = Some(Length::Px(rng.range(20.0, 50.0)));
                el.left = Some(Length::Vw(rng.range(0.0, 100.0)));
                el.animation = Some(Animation {
                    name: "rainFall",
                    duration_s: rng.range(0.5, 1.5),
                    delay_s: rng.range(0.0, 2.0),
                    timing: "linear",
                    repeat: Repeat::Infinite,
                });
                el
            })
            .collect(),
        WeatherKind::Snow => (0..100)
            .map(|_| {
                let mut el = falling_glyph(rng, "❄", (10.0, 30.0), (0.2, 1.0), "snowFall", (5.0, 15.0));
                el.filter = Some(Filter::Blur(rng.range(0.0, 1.0)));
                el
            })
            .collect(),
        WeatherKind::AutumnLeaves => {
            const LEAVES: [&str; 3] = ["🍁", "🍂", "🍃"];
            (0..40)
                .map(|_| {
                    let leaf = rng.pick(&LEAVES).copied().unwrap_or("🍂");
                    let mut el = falling_glyph(rng, leaf, (15.0, 40.0), (0.3, 1.0), "autumnFall", (10.0, 25.0));
                    if is_night {
                        el.filter = Some(Filter::Brightness(0.6));
                    }
                    el
                })
                .collect()
        }
        WeatherKind::StarryNight => (0..200)
            .map(|_| {
                let mut el = WeatherElement::new(Shape::Star, Length::Vh(rng.range(0.0, 100.0)));
                el.width = Some(Length::Px(rng.range(1.0, 4.0)));
                el.height = Some(Length::Px(rng.range(1.0, 4.0)));
                el.left = Some(Length::Vw(rng.range(0.0, 100.0)));
                el.opacity = Some(rng.range(0.2, 1.0));
                el.animation = Some(Animation {
                    name: "twinkle",
                    duration_s: rng.range(2.0, 5.0),
                    delay_s: rng.range(0.0, 3.0),
                    timing: "ease",
                    repeat: Repeat::Alternate,
                });
                el
            })
            .collect(),
        WeatherKind::Moonlight => {
            let mut moon = WeatherElement::new(Shape::Moon, Length::Percent(20.0));
            moon.right = Some(Length::Percent(15.0));
            moon.width = Some(Length::Px(100.0));
            moon.height = Some(Length::Px(100.0));
            moon.opacity = Some(0.8);
            let mut elements = vec![moon];
            for _ in 0..5 {
                let mut crater = WeatherElement::new(Shape::Crater, Length::Percent(rng.range(10.0, 90.0)));
                crater.left = Some(Length::Percent(rng.range(10.0, 90.0)));
                crater.width = Some(Length::Px(rng.range(10.0, 30.0)));
                crater.height = Some(Length::Px(rng.range(10.0, 30.0)));
                crater.parent = Some(0);
                elements.push(crater);
            }
            elements
        }
        WeatherKind::MeteorShower => (0..10u32)
            .map(|i| {
                let mut el = WeatherElement::new(Shape::Meteor, Length::Px(-30.0));
                el.width = Some(Length::Px(2.0));
                el.height = Some(Length::Px(30.0));
                el.left = Some(Length::Vw(rng.range(0.0, 100.0)));
                el.rotation = Some(45.0);
                el.animation = Some(Animation {
                    name: "meteor",
                    duration_s: rng.range(1.0, 3.0),
                    delay_s: 0.0,
                    timing: "linear",
                    repeat: Repeat::Once,
                });
                el.appear_after_ms = i * 2000;
                el.lifetime_ms = Some(3000);
                el
            })
            .collect(),
    }
}

/// `@keyframes fallBlossom`, with its mid-fall opacities rolled once per overlay.
fn blossom_keyframes(rng: &mut Rng) -> String {
    format!(
        "@keyframes fallBlossom {{ \
         0% {{ transform: translateY(0) rotate(0deg) translateX(0); opacity: 0; }} \
         10% {{ opacity: {}; }} \
         90% {{ opacity: {}; }} \
         100% {{ transform: translateY(100vh) rotate(360deg) translateX({}px); opacity: 0; }} }}",
        rng.range(0.3, 1.0),
        rng.range(0.1, 0.6),
        rng.range(-50.0, 50.0),
    )
}

// ---- Overlay ----

pub struct WeatherOverlay {
    state: WeatherState,
    elements: Vec<WeatherElement>,
    rng: Rng,
    reroll: IntervalTimer,
    theme: SubscriberId,
    generation: u32,
    blossom_keyframes: Option<String>,
}

impl WeatherOverlay {
    pub fn new(config: &DecorConfig, theme: &mut Broadcast<ThemeChange>) -> Self {
        Self {
            state: WeatherState {
                kind: WeatherKind::CherryBlossom,
                is_night: false,
            },
            elements: Vec::new(),
            rng: Rng::new(config.seed.wrapping_add(104_729)),
            reroll: IntervalTimer::new(config.weather_period_ms),
            theme: theme.subscribe(),
            generation: 0,
            blossom_keyframes: None,
        }
    }

    /// Pick the first kind from the time-of-day set and build it.
    pub fn init(&mut self, is_night: bool, events: &mut Vec<DecorEvent>) {
        self.state = WeatherState {
            kind: pick_kind(is_night, &mut self.rng),
            is_night,
        };
        log::info!("weather: starting with {}", self.state.kind.as_str());
        self.regenerate(events);
    }

    /// Switch to `kind`. Rebuilds and notifies only when the kind changes.
    pub fn set_weather(&mut self, kind: WeatherKind, events: &mut Vec<DecorEvent>) -> bool {
        if kind == self.state.kind {
            return false;
        }
        self.state.kind = kind;
        log::info!("weather: changed to {}", kind.as_str());
        self.regenerate(events);
        events.push(DecorEvent::Notify(Notification::weather(format!(
            "Weather Changed: {}",
            kind.label()
        ))));
        true
    }

    /// Re-roll from the set matching the current day/night state.
    pub fn reroll(&mut self, events: &mut Vec<DecorEvent>) -> bool {
        let kind = pick_kind(self.state.is_night, &mut self.rng);
        self.set_weather(kind, events)
    }

    /// Apply pending theme broadcasts: take the new night flag and rebuild.
    pub fn sync_theme(&mut self, theme: &mut Broadcast<ThemeChange>, events: &mut Vec<DecorEvent>) {
        if let Some(change) = theme.drain(self.theme).last() {
            if !self.reroll.is_active() {
                return;
            }
            self.state.is_night = change.is_night;
            self.regenerate(events);
        }
    }

    /// Advance the re-roll timer.
    pub fn tick(&mut self, dt_ms: f64, events: &mut Vec<DecorEvent>) {
        for _ in 0..self.reroll.tick(dt_ms) {
            self.reroll(events);
        }
    }

    /// Stop re-rolling and clear the overlay.
    pub fn destroy(&mut self) {
        self.reroll.stop();
        self.elements.clear();
    }

    fn regenerate(&mut self, events: &mut Vec<DecorEvent>) {
        self.elements = generate(self.state.kind, self.state.is_night, &mut self.rng);
        if self.state.kind == WeatherKind::CherryBlossom && self.blossom_keyframes.is_none() {
            self.blossom_keyframes = Some(blossom_keyframes(&mut self.rng));
        }
        self.generation += 1;
        events.push(DecorEvent::WeatherRegenerated {
            kind: self.state.kind.as_str(),
            is_night: self.state.is_night,
        });
    }

    pub fn state(&self) -> WeatherState {
        self.state
    }

    pub fn elements(&self) -> &[WeatherElement] {
        &self.elements
    }

    /// Bumped on every rebuild.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Style sheet text the host injects once, if any.
    pub fn keyframes_css(&self) -> Option<&str> {
        self.blossom_keyframes.as_deref()
    }
}
