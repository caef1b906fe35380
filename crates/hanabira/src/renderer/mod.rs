pub mod glyph;
pub mod instance;

pub use glyph::{Glyph, GLYPHS};
pub use instance::{RenderBuffer, SpriteInstance};
