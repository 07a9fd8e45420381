// Common library for shared code between the web UI and its tests

pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod filter;
pub mod models;
pub mod roster;
pub mod validation;
