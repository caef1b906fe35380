//! Ambient blossom particles.

use glam::Vec2;

use crate::core::rng::Rng;
use crate::renderer::glyph::{self, Glyph};

/// Per-step physics constants shared by every ambient particle.
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    pub attraction_radius: f32,
    pub attraction_strength: f32,
    /// Wrap/reset margin beyond the 0..100 viewport range.
    pub margin: f32,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            attraction_radius: 30.0,
            attraction_strength: 0.001,
            margin: 10.0,
        }
    }
}

/// What a step did to a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Wrapped,
    Reset,
}

/// A falling blossom in viewport units (0..100 on both axes).
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Displacement per step.
    pub vel: Vec2,
    /// Degrees.
    pub rotation: f32,
    /// Degrees per step.
    pub spin: f32,
    /// 1.0 at spawn, decays toward 0.
    pub life: f32,
    /// Life lost per step.
    pub decay: f32,
    /// Font size in pixels.
    pub size: f32,
    pub glyph: Glyph,
    pub opacity: f32,
    /// Light glow (night) or dark shadow (day).
    pub night_glow: bool,
}

impl Particle {
    /// A particle anywhere in the viewport.
    pub fn spawn(rng: &mut Rng, night_glow: bool) -> Self {
        let glyph = rng.pick(&glyph::AMBIENT).copied().unwrap_or(Glyph::BLOSSOM);
        let (vel, spin) = Self::random_velocity(rng);
        Particle {
            pos: Vec2::new(rng.range(0.0, 100.0), rng.range(0.0, 100.0)),
            vel,
            rotation: rng.range(0.0, 360.0),
            spin,
            life: 1.0,
            decay: rng.range(0.0005, 0.0015),
            size: rng.range(15.0, 40.0),
            glyph,
            opacity: rng.range(0.2, 0.8),
            night_glow,
        }
    }

    fn random_velocity(rng: &mut Rng) -> (Vec2, f32) {
        let vel = Vec2::new(rng.range(-0.25, 0.25), rng.range(0.5, 1.0));
        (vel, rng.range(-1.0, 1.0))
    }

    /// Back to a fresh state just above the top edge. Glyph and size are kept.
    pub fn reset(&mut self, rng: &mut Rng, margin: f32, night_glow: bool) {
        let (vel, spin) = Self::random_velocity(rng);
        self.pos = Vec2::new(rng.range(0.0, 100.0), -margin);
        self.vel = vel;
        self.spin = spin;
        self.life = 1.0;
        self.night_glow = night_glow;
    }

    /// Advance one animation step.
    ///
    /// The particle never leaves the active set: exiting the bottom edge or
    /// running out of life resets it to the top.
    pub fn step(
        &mut self,
        pointer: Option<Vec2>,
        params: &StepParams,
        rng: &mut Rng,
        night_glow: bool,
    ) -> StepOutcome {
        if self.life <= 0.0 {
            self.reset(rng, params.margin, night_glow);
            return StepOutcome::Reset;
        }

        self.pos += self.vel;
        self.rotation += self.spin;

        if let Some(pointer) = pointer {
            let to_pointer = pointer - self.pos;
            let r = params.attraction_radius;
            if to_pointer.length_squared() < r * r {
                self.vel += to_pointer * params.attraction_strength;
            }
        }

        let lo = -params.margin;
        let hi = 100.0 + params.margin;
        let mut outcome = StepOutcome::Moved;
        if self.pos.x < lo {
            self.pos.x = hi;
            outcome = StepOutcome::Wrapped;
        } else if self.pos.x > hi {
            self.pos.x = lo;
            outcome = StepOutcome::Wrapped;
        }

        if self.pos.y > hi {
            self.reset(rng, params.margin, night_glow);
            return StepOutcome::Reset;
        }

        self.life -= self.decay;
        self.opacity = (self.life * 0.6).max(0.0);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(pos: Vec2) -> Particle {
        Particle {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            spin: 0.0,
            life: 1.0,
            decay: 0.001,
            size: 20.0,
            glyph: Glyph::BLOSSOM,
            opacity: 0.5,
            night_glow: false,
        }
    }

    #[test]
    fn spawn_ranges() {
        let mut rng = Rng::new(3);
        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, false);
            assert!((0.0..100.0).contains(&p.pos.x));
            assert!((0.0..100.0).contains(&p.pos.y));
            assert!(p.vel.y >= 0.5 && p.vel.y < 1.0);
            assert!(p.vel.x >= -0.25 && p.vel.x < 0.25);
            assert!(p.decay >= 0.0005 && p.decay < 0.0015);
            assert!(p.size >= 15.0 && p.size < 40.0);
        }
    }

    #[test]
    fn exiting_right_edge_wraps_to_left() {
        let mut rng = Rng::new(1);
        let params = StepParams::default();
        let mut p = still(Vec2::new(109.9, 50.0));
        p.vel = Vec2::new(0.5, 0.0);
        assert_eq!(p.step(None, &params, &mut rng, false), StepOutcome::Wrapped);
        assert_eq!(p.pos.x, -10.0);
    }

    #[test]
    fn exiting_left_edge_wraps_to_right() {
        let mut rng = Rng::new(1);
        let params = StepParams::default();
        let mut p = still(Vec2::new(-9.9, 50.0));
        p.vel = Vec2::new(-0.5, 0.0);
        assert_eq!(p.step(None, &params, &mut rng, false), StepOutcome::Wrapped);
        assert_eq!(p.pos.x, 110.0);
    }

    #[test]
    fn exiting_bottom_resets_to_top() {
        let mut rng = Rng::new(1);
        let params = StepParams::default();
        let mut p = still(Vec2::new(50.0, 109.9));
        p.vel = Vec2::new(0.0, 0.5);
        p.life = 0.3;
        assert_eq!(p.step(None, &params, &mut rng, true), StepOutcome::Reset);
        assert_eq!(p.pos.y, -10.0);
        assert_eq!(p.life, 1.0);
        assert!(p.night_glow);
    }

    #[test]
    fn dead_particle_resets_instead_of_vanishing() {
        let mut rng = Rng::new(1);
        let params = StepParams::default();
        let mut p = still(Vec2::new(50.0, 50.0));
        p.life = 0.0;
        assert_eq!(p.step(None, &params, &mut rng, false), StepOutcome::Reset);
        assert_eq!(p.life, 1.0);
        assert_eq!(p.pos.y, -10.0);
    }

    #[test]
    fn pointer_inside_radius_attracts() {
        let mut rng = Rng::new(1);
        let params = StepParams::default();
        let mut p = still(Vec2::new(50.0, 50.0));
        p.step(Some(Vec2::new(60.0, 50.0)), &params, &mut rng, false);
        assert!(p.vel.x > 0.0);
        assert!((p.vel.x - 0.01).abs() < 1e-6);
    }

    #[test]
    fn pointer_outside_radius_is_ignored() {
        let mut rng = Rng::new(1);
        let params = StepParams::default();
        let mut p = still(Vec2::new(50.0, 50.0));
        p.step(Some(Vec2::new(90.0, 50.0)), &params, &mut rng, false);
        assert_eq!(p.vel, Vec2::ZERO);
    }

    #[test]
    fn opacity_tracks_life() {
        let mut rng = Rng::new(1);
        let params = StepParams::default();
        let mut p = still(Vec2::new(50.0, 50.0));
        p.step(None, &params, &mut rng, false);
        assert!((p.opacity - 0.999 * 0.6).abs() < 1e-5);
    }
}
