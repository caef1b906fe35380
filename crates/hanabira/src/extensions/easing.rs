// extensions/easing.rs
//
// Timing curves for keyframed transients (trails, transition blossoms,
// music notes, the cover wipe). Pure math, no state.


/// Timing curve, named after the CSS curve it stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// `ease-out`.
    QuadOut,
    /// `cubic-bezier(0.215, 0.61, 0.355, 1)`.
    CubicOut,
    /// `cubic-bezier(0.86, 0, 0.07, 1)`.
    QuintInOut,
    /// `cubic-bezier(0.175, 0.885, 0.32, 1.275)`, overshoots past 1.
    BackOut,
}

impl Easing {
    /// Map normalized time `t` in [0, 1] to eased progress.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuintInOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One keyframe: the animated properties at an offset in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub offset: f32,
    pub scale: f32,
    pub rotation: f32,
    pub opacity: f32,
    /// Vertical translation in pixels.
    pub rise: f32,
}

impl Keyframe {
    pub const fn new(offset: f32, scale: f32, rotation: f32, opacity: f32) -> Self {
        Self { offset, scale, rotation, opacity, rise: 0.0 }
    }

    pub const fn with_rise(mut self, rise: f32) -> Self {
        self.rise = rise;
        self
    }
}

/// Sample a keyframe track (sorted by offset, evenly or unevenly spaced)
/// at eased progress `p`. Values between frames are linearly interpolated.
pub fn sample(track: &[Keyframe], p: f32) -> Keyframe {
    let Some(first) = track.first() else {
        return Keyframe::new(0.0, 1.0, 0.0, 1.0);
    };
    if p <= first.offset {
        return *first;
    }
    for pair in track.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if p <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let t = (p - a.offset) / span;
            return Keyframe {
                offset: p,
                scale: lerp(a.scale, b.scale, t),
                rotation: lerp(a.rotation, b.rotation, t),
                opacity: lerp(a.opacity, b.opacity, t),
                rise: lerp(a.rise, b.rise, t),
            };
        }
    }
    track[track.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for e in [Easing::Linear, Easing::QuadOut, Easing::CubicOut, Easing::QuintInOut, Easing::BackOut] {
            assert!(e.apply(0.0).abs() < 1e-5, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-5, "{e:?} at 1");
        }
    }

    #[test]
    fn quad_out_faster_start() {
        assert!(Easing::QuadOut.apply(0.5) > 0.5);
    }

    #[test]
    fn quint_in_out_is_symmetric() {
        let a = Easing::QuintInOut.apply(0.25);
        let b = Easing::QuintInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn back_out_overshoots() {
        assert!(Easing::BackOut.apply(0.7) > 1.0);
    }

    #[test]
    fn sample_interpolates_between_frames() {
        let track = [
            Keyframe::new(0.0, 0.0, 0.0, 0.0),
            Keyframe::new(0.5, 1.5, 180.0, 0.8),
            Keyframe::new(1.0, 0.0, 360.0, 0.0),
        ];
        let mid = sample(&track, 0.25);
        assert!((mid.scale - 0.75).abs() < 1e-5);
        assert!((mid.rotation - 90.0).abs() < 1e-4);
        assert_eq!(sample(&track, 1.0).opacity, 0.0);
        assert_eq!(sample(&track, 2.0).rotation, 360.0);
    }
}
