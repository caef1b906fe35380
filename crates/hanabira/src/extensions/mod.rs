// extensions/mod.rs
//
// Helpers shared by the effect systems but independent of any of them.

pub mod easing;

pub use easing::{lerp, sample, Easing, Keyframe};
