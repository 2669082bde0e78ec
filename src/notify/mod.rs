mod dingtalk;

pub use dingtalk::*;
