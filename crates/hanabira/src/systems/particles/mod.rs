//! Particle engine: ambient blossoms, pointer trails and click bursts.
//!
//! All particles live in owned collections advanced by one `step` call per
//! animation frame. Ambient blossoms recycle forever; bursts and trails are
//! removed when their animation ends, so memory is bounded by the ambient
//! count plus whatever the current input rate spawns.

mod particle;
mod transient;

pub use particle::{Particle, StepOutcome, StepParams};
pub use transient::{BurstParticle, TrailParticle};

use glam::Vec2;

use crate::api::config::DecorConfig;
use crate::api::types::SoundEvent;
use crate::core::rng::Rng;
use crate::core::signal::{Broadcast, SubscriberId, ThemeChange};

pub struct ParticleEngine {
    particles: Vec<Particle>,
    bursts: Vec<BurstParticle>,
    trails: Vec<TrailParticle>,
    params: StepParams,
    /// Last known pointer, viewport units. None until the pointer first moves.
    pointer: Option<Vec2>,
    /// Viewport size in pixels.
    viewport: Vec2,
    is_night: bool,
    burst_count: usize,
    burst_stagger_ms: f32,
    mouse_trail_chance: f32,
    touch_trail_chance: f32,
    rng: Rng,
    theme: SubscriberId,
    running: bool,
}

impl ParticleEngine {
    /// Create the engine and subscribe it to theme changes.
    pub fn new(config: &DecorConfig, theme: &mut Broadcast<ThemeChange>) -> Self {
        Self {
            particles: Vec::with_capacity(config.ambient_count),
            bursts: Vec::new(),
            trails: Vec::new(),
            params: StepParams {
                attraction_radius: config.attraction_radius,
                attraction_strength: config.attraction_strength,
                margin: config.wrap_margin,
            },
            pointer: None,
            viewport: Vec2::new(config.viewport_width, config.viewport_height),
            is_night: false,
            burst_count: config.burst_count,
            burst_stagger_ms: config.burst_stagger_ms,
            mouse_trail_chance: config.mouse_trail_chance,
            touch_trail_chance: config.touch_trail_chance,
            rng: Rng::new(config.seed.wrapping_add(7919)),
            theme: theme.subscribe(),
            running: true,
        }
    }

    /// Create `count` ambient particles with randomized state.
    pub fn spawn(&mut self, count: usize) {
        for _ in 0..count {
            let p = Particle::spawn(&mut self.rng, self.is_night);
            self.particles.push(p);
        }
        log::debug!("particles: spawned {count}, {} ambient", self.particles.len());
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    /// Track the pointer (client pixels) and maybe leave a trail sparkle.
    pub fn pointer_moved(&mut self, x: f32, y: f32, touch: bool) {
        self.pointer = Some(Vec2::new(x / self.viewport.x * 100.0, y / self.viewport.y * 100.0));
        let chance = if touch { self.touch_trail_chance } else { self.mouse_trail_chance };
        if self.running && self.rng.chance(chance) {
            let trail = TrailParticle::new(Vec2::new(x, y), &mut self.rng);
            self.trails.push(trail);
        }
    }

    /// Spawn a staggered burst at a click/tap position (client pixels).
    pub fn burst_at(&mut self, x: f32, y: f32) -> Option<SoundEvent> {
        if !self.running {
            return None;
        }
        let origin = Vec2::new(x, y);
        for i in 0..self.burst_count {
            let delay = i as f32 * self.burst_stagger_ms;
            let p = BurstParticle::new(origin, delay, &mut self.rng);
            self.bursts.push(p);
        }
        Some(SoundEvent::CLICK)
    }

    /// Apply any pending theme broadcasts.
    pub fn sync_theme(&mut self, theme: &mut Broadcast<ThemeChange>) {
        if let Some(change) = theme.drain(self.theme).last() {
            self.set_night(change.is_night);
        }
    }

    pub fn set_night(&mut self, is_night: bool) {
        self.is_night = is_night;
        for p in &mut self.particles {
            p.night_glow = is_night;
        }
    }

    /// Advance every particle by one animation step of `dt_ms`.
    pub fn step(&mut self, dt_ms: f32) {
        if !self.running {
            return;
        }
        let pointer = self.pointer;
        let night = self.is_night;
        for p in &mut self.particles {
            p.step(pointer, &self.params, &mut self.rng, night);
        }
        self.bursts.retain_mut(|b| b.step(dt_ms));
        self.trails.retain_mut(|t| t.step(dt_ms));
    }

    /// Stop animating and drop every particle.
    pub fn destroy(&mut self) {
        self.running = false;
        self.particles.clear();
        self.bursts.clear();
        self.trails.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bursts(&self) -> &[BurstParticle] {
        &self.bursts
    }

    pub fn trails(&self) -> &[TrailParticle] {
        &self.trails
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn is_night(&self) -> bool {
        self.is_night
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Every live particle, ambient and transient.
    pub fn total_count(&self) -> usize {
        self.particles.len() + self.bursts.len() + self.trails.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> (ParticleEngine, Broadcast<ThemeChange>) {
        let mut bus = Broadcast::new();
        let engine = ParticleEngine::new(&DecorConfig::default(), &mut bus);
        (engine, bus)
    }

    #[test]
    fn spawn_creates_requested_count() {
        let (mut e, _) = engine();
        e.spawn(100);
        assert_eq!(e.particles().len(), 100);
    }

    #[test]
    fn ambient_particles_recycle_over_many_steps() {
        let (mut e, _) = engine();
        e.spawn(100);
        for _ in 0..1000 {
            e.step(1000.0 / 60.0);
        }
        assert_eq!(e.particles().len(), 100);
        for p in e.particles() {
            assert!(p.pos.x >= -10.0 && p.pos.x <= 110.0);
            assert!(p.pos.y <= 110.0);
        }
    }

    #[test]
    fn pointer_is_stored_in_viewport_units() {
        let (mut e, _) = engine();
        e.set_viewport(1000.0, 500.0);
        e.pointer_moved(250.0, 250.0, false);
        assert_eq!(e.pointer(), Some(Vec2::new(25.0, 50.0)));
    }

    #[test]
    fn burst_spawns_fifteen_and_clears_itself() {
        let (mut e, _) = engine();
        assert_eq!(e.burst_at(100.0, 100.0), Some(SoundEvent::CLICK));
        assert_eq!(e.bursts().len(), 15);
        for _ in 0..200 {
            e.step(1000.0 / 60.0);
        }
        assert!(e.bursts().is_empty());
    }

    #[test]
    fn trails_are_probabilistic_and_expire() {
        let (mut e, _) = engine();
        for i in 0..1000 {
            e.pointer_moved(i as f32, 10.0, false);
        }
        let spawned = e.trails().len();
        assert!(spawned > 200 && spawned < 400, "spawned {spawned} trails");
        for _ in 0..120 {
            e.step(1000.0 / 60.0);
        }
        assert!(e.trails().is_empty());
    }

    #[test]
    fn theme_broadcast_updates_glow() {
        let (mut e, mut bus) = engine();
        e.spawn(5);
        bus.publish(ThemeChange { is_night: true });
        e.sync_theme(&mut bus);
        assert!(e.is_night());
        assert!(e.particles().iter().all(|p| p.night_glow));
    }

    #[test]
    fn destroy_stops_everything() {
        let (mut e, _) = engine();
        e.spawn(10);
        e.burst_at(1.0, 1.0);
        e.destroy();
        assert_eq!(e.total_count(), 0);
        assert_eq!(e.burst_at(1.0, 1.0), None);
        e.step(16.0);
        assert_eq!(e.total_count(), 0);
    }
}
