//! Command implementations

pub mod config;
pub mod history;
pub mod optimize;
pub mod profiles;
pub mod score;
