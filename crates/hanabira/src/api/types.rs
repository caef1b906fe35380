use serde::Serialize;

/// A sound cue emitted by the effects. The host maps names to audio assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SoundEvent(pub &'static str);

impl SoundEvent {
    pub const CLICK: SoundEvent = SoundEvent("click");
}

/// Which corner stack a notification toast belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Progress tracker toasts (top: 80px).
    Progress,
    /// Weather change toasts (top: 100px).
    Weather,
}

/// A transient on-screen message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// How long the toast stays visible before sliding out.
    pub duration_ms: u32,
}

impl Notification {
    pub const PROGRESS_DURATION_MS: u32 = 4000;
    pub const WEATHER_DURATION_MS: u32 = 3000;

    pub fn progress(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Progress,
            message: message.into(),
            duration_ms: Self::PROGRESS_DURATION_MS,
        }
    }

    pub fn weather(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Weather,
            message: message.into(),
            duration_ms: Self::WEATHER_DURATION_MS,
        }
    }
}

/// Events the host applies to the page after each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DecorEvent {
    /// Show a toast.
    Notify(Notification),
    /// Perform the real navigation now.
    Navigate { url: String },
    /// The weather overlay was rebuilt; re-read its elements.
    WeatherRegenerated { kind: &'static str, is_night: bool },
    /// The night theme toggled.
    ThemeChanged { is_night: bool },
    /// Show (true) or start fading out (false) the loading screen.
    LoadingScreen { visible: bool },
    /// The music widget switched tracks.
    TrackChanged { index: usize, name: &'static str, artist: &'static str },
    /// Playback started or stopped.
    Playback { playing: bool },
    /// Volume changed (drives the slider fill).
    Volume { volume: f32 },
    /// Progress indicators changed; re-read the progress view.
    ProgressChanged,
    /// Page-specific tear drop spawned.
    Tear { css: String, lifetime_ms: u32 },
}
