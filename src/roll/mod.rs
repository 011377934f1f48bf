pub mod rng;
pub mod roller;

pub use rng::Rng;
pub use roller::{RollFunction, SeededRoller};
