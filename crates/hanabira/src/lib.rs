pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod storage;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::app::DecorApp;
pub use api::config::DecorConfig;
pub use api::types::{DecorEvent, Notification, NotificationKind, SoundEvent};
pub use crate::core::clock::{Clock, FixedClock};
pub use crate::core::rng::Rng;
pub use crate::core::signal::{Broadcast, SubscriberId, ThemeChange};
pub use crate::core::time::FixedTimestep;
pub use crate::core::timer::{Delay, IntervalTimer};
pub use input::queue::{ClickTarget, InputEvent, InputQueue};
pub use renderer::glyph::{Glyph, GLYPHS};
pub use renderer::instance::{RenderBuffer, SpriteInstance};
pub use storage::{KeyValueStore, MemoryStore, PlayState, PreferenceStore, Preferences, StoreError, ThemePreference};
pub use systems::music::{MusicNote, MusicWidget, Track, Visualizer, PLAYLIST};
pub use systems::particles::{BurstParticle, Particle, ParticleEngine, TrailParticle};
pub use systems::progress::{Achievement, ProgressTracker, ProgressView, Stats, ACHIEVEMENTS};
pub use systems::transition::{EntranceSchedule, LoadingPhase, LoadingScreen, TearEffect, TransitionController};
pub use systems::weather::{WeatherElement, WeatherKind, WeatherOverlay, WeatherState};

// Extensions: standalone helpers
pub use extensions::{lerp, sample, Easing, Keyframe};
