//! Onboarding dispatcher - welcome and informational replies

use std::sync::Arc;

use crate::application::content;
use crate::domain::entities::{OutboundMessage, Response};
use crate::domain::traits::Gateway;

/// Composes and sends onboarding content.
///
/// Two paths: an ephemeral welcome when a user joins a channel, and a
/// threaded informational reply when a trigger word fires. Delivery is
/// fire-and-forget; failures are logged and never bubble up.
pub struct Onboarder<G: Gateway> {
    gateway: Arc<G>,
    welcome: Response,
    autoreply: Response,
}

impl<G: Gateway> Onboarder<G> {
    pub fn new(gateway: Arc<G>, faq_url: &str) -> Self {
        Self {
            gateway,
            welcome: Response::block(content::welcome_block(faq_url)),
            autoreply: Response::block(content::autoreply_block(faq_url)),
        }
    }

    /// Ephemeral welcome to a user who just joined a channel. Only the
    /// joining user sees it, and it is never threaded.
    pub async fn welcome(&self, user: &str, channel: &str) {
        let message = OutboundMessage::new(channel, user).with_response(&self.welcome);
        if let Err(err) = self.gateway.send_ephemeral(&message).await {
            tracing::error!("failed to deliver welcome to '{}': {}", user, err);
        }
    }

    /// Informational reply in the thread a trigger word was seen in.
    pub async fn inform(&self, user: &str, channel: &str, thread_ts: &str) {
        let message = OutboundMessage::new(channel, user)
            .in_thread(thread_ts)
            .with_response(&self.autoreply);
        if let Err(err) = self.gateway.send_message(&message).await {
            tracing::error!("failed to deliver auto-reply to '{}': {}", user, err);
        }
    }
}
