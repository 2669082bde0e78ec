pub mod logger;
pub mod settings;

pub mod domain_model;
pub mod domain_port;
pub mod application_impl;

pub mod auth_cache;
pub mod data_loader;
pub mod notify;
pub mod screenshot;
pub mod wait;

pub mod infra_mysql;
pub mod infra_redis;
