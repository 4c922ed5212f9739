pub mod cache;
pub mod config;
pub mod memory;
pub mod stdio;
