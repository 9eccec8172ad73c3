//! Command implementations

pub mod config;
pub mod create;
pub mod delete;
pub mod deploy;
pub mod list;
pub mod ssh;
