//! Channel onboarding and FAQ auto-reply bot.
//!
//! The core is the message-routing and admin-authorization logic:
//! classify each inbound platform event, consult the admin registry and
//! command table, and perform at most one outbound send per event.

pub mod application;
pub mod domain;
pub mod infrastructure;
