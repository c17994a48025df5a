pub mod config;
pub mod logging;

pub mod catalog;
pub mod fetch;
pub mod scheduler;
pub mod storage;
