//! CLI command implementations.

pub mod audit;
pub mod check;
pub mod config;
pub mod roles;
pub mod version;
