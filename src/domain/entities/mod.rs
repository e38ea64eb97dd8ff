//! Domain entities - Core business objects with no external dependencies

pub mod event;
pub mod response;

pub use event::{Event, MessageEvent};
pub use response::{ContentBlock, OutboundMessage, Response};
