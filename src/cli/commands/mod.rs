//! CLI command handlers

pub mod check;
pub mod config;
pub mod serve;
pub mod validate;
