pub mod music;
pub mod particles;
pub mod progress;
pub mod render;
pub mod transition;
pub mod weather;
