//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Registry: Admin-group membership cache
//! - Commands: Static command table
//! - Router: Message classification and dispatch
//! - Onboarding: Welcome and auto-reply composition
//! - Dispatcher: Event-kind fan-out

pub mod commands;
pub mod content;
pub mod dispatcher;
pub mod errors;
pub mod onboarding;
pub mod registry;
pub mod router;
