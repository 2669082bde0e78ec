mod session;
mod report;

pub use session::*;
pub use report::*;
