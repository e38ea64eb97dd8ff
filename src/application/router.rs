//! Message router - classifies inbound messages and dispatches replies

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::commands::CommandTable;
use crate::application::onboarding::Onboarder;
use crate::application::registry::AdminRegistry;
use crate::domain::entities::{MessageEvent, OutboundMessage};
use crate::domain::traits::Gateway;

/// What the router decided to do with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    CommandExecuted(String),
    OnboardTriggered(String),
}

/// Routing policy fixed at configuration time.
#[derive(Debug, Clone, Default)]
pub struct RoutingPolicy {
    /// Channels the bot reacts to message traffic in.
    pub channels: HashSet<String>,
    /// Case-insensitive substrings that fire an auto-reply.
    pub triggers: HashSet<String>,
    /// Users whose messages are never reacted to.
    pub ignored_users: HashSet<String>,
    /// When set, admins do not receive trigger-word auto-replies.
    /// Commands are never gated either way.
    pub admins_bypass_triggers: bool,
}

impl RoutingPolicy {
    /// Normalize trigger words for the lowercased-substring scan.
    fn normalized(mut self) -> Self {
        self.triggers = self
            .triggers
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();
        self
    }
}

/// Classifies each inbound message and performs at most one send.
///
/// The filter order is a deliberate priority policy: bot origin, channel,
/// ignored sender, empty text, exact command, admin bypass, trigger scan.
/// First match wins.
pub struct Router<G: Gateway> {
    gateway: Arc<G>,
    registry: Arc<AdminRegistry>,
    onboarder: Arc<Onboarder<G>>,
    commands: CommandTable,
    policy: RoutingPolicy,
}

impl<G: Gateway> Router<G> {
    pub fn new(
        gateway: Arc<G>,
        registry: Arc<AdminRegistry>,
        onboarder: Arc<Onboarder<G>>,
        commands: CommandTable,
        policy: RoutingPolicy,
    ) -> Self {
        Self {
            gateway,
            registry,
            onboarder,
            commands,
            policy: policy.normalized(),
        }
    }

    /// Handle one posted message.
    ///
    /// The classification result is independent of delivery success:
    /// sends are attempted at most once and failures are only logged.
    pub async fn handle_message(&self, event: &MessageEvent) -> Outcome {
        if event.from_bot {
            // this is a bot, possibly myself
            tracing::debug!("ignoring bot message");
            return Outcome::Ignored;
        }

        if !self.policy.channels.contains(&event.channel) {
            tracing::debug!("ignoring message in unmonitored channel ({})", event.channel);
            return Outcome::Ignored;
        }

        if self.policy.ignored_users.contains(&event.user) {
            tracing::debug!("ignoring message from ignored user {}", event.user);
            return Outcome::Ignored;
        }

        if event.text.is_empty() {
            return Outcome::Ignored;
        }
        let text = event.text.trim().to_lowercase();

        if self.commands.contains(&text) {
            // Use thread_ts rather than ts: a command issued in the main
            // channel must not start a thread, but a command issued inside
            // a thread replies there.
            self.execute_command(&text, &event.user, &event.channel, event.thread_ts.as_deref())
                .await;
            return Outcome::CommandExecuted(text);
        }

        if self.policy.admins_bypass_triggers && self.registry.is_admin(&event.user).await {
            tracing::debug!("ignoring admin message");
            return Outcome::Ignored;
        }

        for trigger in &self.policy.triggers {
            if text.contains(trigger.as_str()) {
                tracing::debug!(
                    "triggered word={} message={} user={}",
                    trigger,
                    text,
                    event.user
                );
                self.onboarder
                    .inform(&event.user, &event.channel, event.reply_thread())
                    .await;
                return Outcome::OnboardTriggered(trigger.clone());
            }
        }

        Outcome::Ignored
    }

    /// Send a command's canned response.
    ///
    /// The unknown-token branch is unreachable from `handle_message`,
    /// which only calls this after a table hit.
    pub async fn execute_command(
        &self,
        cmd: &str,
        user: &str,
        channel: &str,
        thread_ts: Option<&str>,
    ) {
        let Some(response) = self.commands.get(cmd) else {
            tracing::error!("unknown command '{}' from user '{}'", cmd, user);
            return;
        };
        tracing::debug!("triggered command: user={} cmd={}", user, cmd);

        let mut message = OutboundMessage::new(channel, user).with_response(response);
        if let Some(ts) = thread_ts {
            message = message.in_thread(ts);
        }
        if let Err(err) = self.gateway.send_message(&message).await {
            tracing::error!("failed to deliver command reply '{}': {}", cmd, err);
        }
    }
}
