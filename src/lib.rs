pub mod common;
pub mod config;
pub mod errors;
pub mod render;
pub mod series;
pub mod storage;

#[cfg(feature = "server")]
pub mod server;
