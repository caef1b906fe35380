use crate::renderer::glyph::Glyph;
use crate::renderer::instance::{RenderBuffer, SpriteInstance};
use crate::systems::music::MusicWidget;
use crate::systems::particles::ParticleEngine;
use crate::systems::transition::TransitionController;

fn flags(bits: &[(bool, u32)]) -> f32 {
    bits.iter().filter(|(on, _)| *on).fold(0u32, |acc, (_, bit)| acc | bit) as f32
}

/// Build the sprite buffer for one frame.
/// Ambient blossoms (viewport units) first, then every pixel-anchored
/// transient. Sets `viewport_split` at the boundary.
pub fn build_render_buffer(
    particles: &ParticleEngine,
    transition: &TransitionController,
    music: &MusicWidget,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();

    for p in particles.particles() {
        buffer.push(SpriteInstance {
            x: p.pos.x,
            y: p.pos.y,
            rotation: p.rotation,
            scale: 1.0,
            glyph: p.glyph.0 as f32,
            alpha: p.opacity,
            size: p.size,
            flags: flags(&[(p.night_glow, SpriteInstance::FLAG_NIGHT_GLOW)]),
        });
    }
    buffer.end_viewport_run();

    for t in particles.trails() {
        let frame = t.frame();
        buffer.push(SpriteInstance {
            x: t.pos.x,
            y: t.pos.y,
            rotation: frame.rotation,
            scale: frame.scale,
            glyph: Glyph::SPARKLES.0 as f32,
            alpha: frame.opacity,
            size: t.size,
            flags: 0.0,
        });
    }

    for b in particles.bursts().iter().filter(|b| b.is_visible()) {
        buffer.push(SpriteInstance {
            x: b.pos.x,
            y: b.pos.y,
            rotation: b.rotation(),
            scale: 1.0,
            glyph: b.glyph.0 as f32,
            alpha: b.opacity.max(0.0),
            size: b.size,
            flags: SpriteInstance::FLAG_FOREGROUND as f32,
        });
    }

    for b in transition.blossoms().iter().filter(|b| b.is_visible()) {
        let frame = b.frame();
        buffer.push(SpriteInstance {
            x: b.pos.x,
            y: b.pos.y,
            rotation: frame.rotation,
            scale: frame.scale,
            glyph: b.glyph().0 as f32,
            alpha: frame.opacity,
            size: b.size,
            flags: SpriteInstance::FLAG_FOREGROUND as f32,
        });
    }

    for n in music.notes() {
        let frame = n.frame();
        buffer.push(SpriteInstance {
            x: n.pos.x,
            y: n.pos.y + frame.rise,
            rotation: 0.0,
            scale: frame.scale,
            glyph: n.glyph.0 as f32,
            alpha: frame.opacity,
            size: n.size,
            flags: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::DecorConfig;
    use crate::core::signal::Broadcast;

    #[test]
    fn ambient_run_comes_first() {
        let config = DecorConfig::default();
        let mut bus = Broadcast::new();
        let mut particles = ParticleEngine::new(&config, &mut bus);
        particles.spawn(10);
        particles.burst_at(50.0, 50.0);
        let mut transition = TransitionController::new(&config);
        transition.navigate("sorry.html");
        let music = MusicWidget::new(&config);

        let mut buffer = RenderBuffer::new();
        build_render_buffer(&particles, &transition, &music, &mut buffer);

        assert_eq!(buffer.viewport_split, 10);
        // Only the undelayed burst particle and transition blossom are visible yet.
        assert_eq!(buffer.instance_count(), 12);
        assert!(buffer.instances[10..].iter().all(|s| s.has_flag(SpriteInstance::FLAG_FOREGROUND)));
        assert_eq!(buffer.instances[11].glyph, Glyph::BLOSSOM.0 as f32);
    }

    #[test]
    fn night_glow_sets_flag() {
        let config = DecorConfig::default();
        let mut bus = Broadcast::new();
        let mut particles = ParticleEngine::new(&config, &mut bus);
        particles.spawn(3);
        particles.set_night(true);
        let transition = TransitionController::new(&config);
        let music = MusicWidget::new(&config);

        let mut buffer = RenderBuffer::new();
        build_render_buffer(&particles, &transition, &music, &mut buffer);
        assert!(buffer.instances.iter().all(|s| s.has_flag(SpriteInstance::FLAG_NIGHT_GLOW)));
    }
}
