use async_trait::async_trait;
use std::collections::HashSet;

use crate::application::errors::GatewayError;
use crate::domain::entities::OutboundMessage;

/// Gateway trait - abstraction for the outbound chat-platform client
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Post a normal channel message.
    async fn send_message(&self, message: &OutboundMessage) -> Result<(), GatewayError>;

    /// Post an ephemeral message, visible only to `message.user`.
    async fn send_ephemeral(&self, message: &OutboundMessage) -> Result<(), GatewayError>;

    /// List the current members of a user group.
    async fn list_group_members(&self, group: &str) -> Result<HashSet<String>, GatewayError>;

    /// Cheap connectivity check, called once at startup.
    async fn probe(&self) -> Result<(), GatewayError>;
}
