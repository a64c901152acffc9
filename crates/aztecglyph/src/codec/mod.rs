mod alphabet;

pub use alphabet::*;
