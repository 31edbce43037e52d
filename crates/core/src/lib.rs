pub mod common;
pub mod config;
pub mod engine;
pub mod market;
pub mod stream;
