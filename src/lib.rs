pub mod config;
pub mod errors;
pub mod fuel_log;
pub mod logging;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod web;

pub type Result<T> = anyhow::Result<T>;
