mod wait;

pub use wait::*;
