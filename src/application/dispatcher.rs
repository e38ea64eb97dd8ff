//! Event dispatcher - fans decoded events out to their handlers

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::onboarding::Onboarder;
use crate::application::registry::AdminRegistry;
use crate::application::router::{Outcome, Router};
use crate::domain::entities::Event;
use crate::domain::traits::Gateway;

/// Routes each decoded event to the right component.
///
/// Message traffic goes through the [`Router`]; channel joins go straight
/// to the [`Onboarder`]; subteam updates hit the [`AdminRegistry`]
/// directly, bypassing the router entirely.
pub struct Dispatcher<G: Gateway> {
    router: Router<G>,
    onboarder: Arc<Onboarder<G>>,
    registry: Arc<AdminRegistry>,
    /// Monitored channels, consulted for joins only when `filter_joins`.
    channels: HashSet<String>,
    filter_joins: bool,
}

impl<G: Gateway> Dispatcher<G> {
    pub fn new(
        router: Router<G>,
        onboarder: Arc<Onboarder<G>>,
        registry: Arc<AdminRegistry>,
        channels: HashSet<String>,
        filter_joins: bool,
    ) -> Self {
        Self {
            router,
            onboarder,
            registry,
            channels,
            filter_joins,
        }
    }

    pub async fn dispatch(&self, event: Event) {
        match event {
            Event::Message(message) => {
                let outcome = self.router.handle_message(&message).await;
                if outcome != Outcome::Ignored {
                    tracing::debug!("message handled: {:?}", outcome);
                }
            }
            Event::MemberJoinedChannel { channel, user } => {
                if self.filter_joins && !self.channels.contains(&channel) {
                    tracing::debug!("ignoring join in unmonitored channel ({})", channel);
                    return;
                }
                tracing::debug!("member_joined_channel channel={} user={}", channel, user);
                self.onboarder.welcome(&user, &channel).await;
            }
            Event::SubteamUpdated { subteam_id, users } => {
                self.registry.handle_group_update(&subteam_id, users).await;
            }
        }
    }
}
