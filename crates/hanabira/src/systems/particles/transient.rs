//! Short-lived pixel-space particles: click bursts and pointer trails.

use glam::Vec2;

use crate::core::rng::Rng;
use crate::extensions::easing::{sample, Easing, Keyframe};
use crate::renderer::glyph::{self, Glyph};

/// One particle of a click/tap burst. Flies radially and fades linearly.
#[derive(Debug, Clone)]
pub struct BurstParticle {
    /// Client pixels.
    pub pos: Vec2,
    /// Pixels per step.
    pub vel: Vec2,
    pub opacity: f32,
    pub size: f32,
    pub glyph: Glyph,
    /// Time left before the particle appears.
    pub delay_ms: f32,
}

impl BurstParticle {
    pub const START_OPACITY: f32 = 0.9;
    pub const FADE_PER_STEP: f32 = 0.02;

    pub fn new(origin: Vec2, delay_ms: f32, rng: &mut Rng) -> Self {
        let angle = rng.range(0.0, std::f32::consts::TAU);
        let speed = rng.range(1.0, 3.0);
        Self {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            opacity: Self::START_OPACITY,
            size: rng.range(15.0, 35.0),
            glyph: rng.pick(&glyph::BURST).copied().unwrap_or(Glyph::BLOSSOM),
            delay_ms,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.delay_ms <= 0.0
    }

    /// Degrees; the burst spins with its travel.
    pub fn rotation(&self) -> f32 {
        self.pos.x + self.pos.y
    }

    /// Advance one step. Returns false once fully faded.
    pub fn step(&mut self, dt_ms: f32) -> bool {
        if self.delay_ms > 0.0 {
            self.delay_ms -= dt_ms;
            if self.delay_ms > 0.0 {
                return true;
            }
        }
        self.pos += self.vel;
        self.opacity -= Self::FADE_PER_STEP;
        self.opacity > 0.0
    }
}

/// Sparkle left behind by the pointer: shrinks, spins and fades out.
#[derive(Debug, Clone)]
pub struct TrailParticle {
    pub pos: Vec2,
    pub size: f32,
    pub duration_ms: f32,
    pub elapsed_ms: f32,
}

impl TrailParticle {
    const TRACK: [Keyframe; 2] = [
        Keyframe::new(0.0, 1.0, 0.0, 0.8),
        Keyframe::new(1.0, 0.0, 180.0, 0.0),
    ];

    pub fn new(pos: Vec2, rng: &mut Rng) -> Self {
        Self {
            pos,
            size: rng.range(5.0, 15.0),
            duration_ms: rng.range(1000.0, 1500.0),
            elapsed_ms: 0.0,
        }
    }

    /// Current animated properties.
    pub fn frame(&self) -> Keyframe {
        let t = self.elapsed_ms / self.duration_ms;
        sample(&Self::TRACK, Easing::QuadOut.apply(t))
    }

    /// Advance by `dt_ms`. Returns false once the animation has finished.
    pub fn step(&mut self, dt_ms: f32) -> bool {
        self.elapsed_ms += dt_ms;
        self.elapsed_ms < self.duration_ms
    }
}
