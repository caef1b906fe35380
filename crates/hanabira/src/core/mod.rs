pub mod clock;
pub mod rng;
pub mod signal;
pub mod time;
pub mod timer;
