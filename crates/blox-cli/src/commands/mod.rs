//! CLI command modules

pub mod config;
pub mod levels;
pub mod play;
pub mod train;
