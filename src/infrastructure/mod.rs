//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (Slack gateway, console intake)

pub mod adapters;
pub mod config;
