mod screenshot;

pub use screenshot::*;
