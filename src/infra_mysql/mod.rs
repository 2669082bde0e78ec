mod mysql_helper;

pub use mysql_helper::*;
