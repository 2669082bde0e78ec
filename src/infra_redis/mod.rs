mod redis_helper;

pub use redis_helper::*;
