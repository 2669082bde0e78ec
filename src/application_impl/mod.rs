mod browser_session_fake;

pub use browser_session_fake::*;
