//! Router and dispatcher integration tests
//! Run with: cargo test --test router_test

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use onboard_bot::application::commands::CommandTable;
use onboard_bot::application::content::DEFAULT_FAQ_URL;
use onboard_bot::application::dispatcher::Dispatcher;
use onboard_bot::application::errors::GatewayError;
use onboard_bot::application::onboarding::Onboarder;
use onboard_bot::application::registry::AdminRegistry;
use onboard_bot::application::router::{Outcome, Router, RoutingPolicy};
use onboard_bot::domain::entities::{Event, MessageEvent, OutboundMessage};
use onboard_bot::domain::traits::Gateway;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Delivery {
    Channel,
    Ephemeral,
}

#[derive(Debug, Clone)]
struct Sent {
    delivery: Delivery,
    message: OutboundMessage,
}

/// Gateway double that records every send instead of delivering it.
struct MockGateway {
    sent: Mutex<Vec<Sent>>,
    groups: HashMap<String, HashSet<String>>,
    failing_groups: HashSet<String>,
}

impl MockGateway {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            groups: HashMap::new(),
            failing_groups: HashSet::new(),
        }
    }

    fn with_group(mut self, id: &str, users: &[&str]) -> Self {
        self.groups
            .insert(id.to_string(), users.iter().map(|u| u.to_string()).collect());
        self
    }

    fn with_failing_group(mut self, id: &str) -> Self {
        self.failing_groups.insert(id.to_string());
        self
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn send_message(&self, message: &OutboundMessage) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(Sent {
            delivery: Delivery::Channel,
            message: message.clone(),
        });
        Ok(())
    }

    async fn send_ephemeral(&self, message: &OutboundMessage) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(Sent {
            delivery: Delivery::Ephemeral,
            message: message.clone(),
        });
        Ok(())
    }

    async fn list_group_members(&self, group: &str) -> Result<HashSet<String>, GatewayError> {
        if self.failing_groups.contains(group) {
            return Err(GatewayError::Api("no_such_subteam".to_string()));
        }
        self.groups
            .get(group)
            .cloned()
            .ok_or_else(|| GatewayError::Api("no_such_subteam".to_string()))
    }

    async fn probe(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

struct Fixture {
    gateway: Arc<MockGateway>,
    registry: Arc<AdminRegistry>,
    router: Router<MockGateway>,
}

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

async fn fixture(gateway: MockGateway, policy: RoutingPolicy) -> Fixture {
    let gateway = Arc::new(gateway);
    let group_ids: HashSet<String> = gateway
        .groups
        .keys()
        .chain(gateway.failing_groups.iter())
        .cloned()
        .collect();
    let registry = Arc::new(
        AdminRegistry::initialize(gateway.as_ref(), &group_ids, to_set(&["root"])).await,
    );
    let onboarder = Arc::new(Onboarder::new(gateway.clone(), DEFAULT_FAQ_URL));
    let router = Router::new(
        gateway.clone(),
        registry.clone(),
        onboarder,
        CommandTable::build(DEFAULT_FAQ_URL),
        policy,
    );
    Fixture {
        gateway,
        registry,
        router,
    }
}

fn default_policy() -> RoutingPolicy {
    RoutingPolicy {
        channels: to_set(&["C1"]),
        triggers: to_set(&["help me"]),
        ignored_users: HashSet::new(),
        admins_bypass_triggers: true,
    }
}

#[tokio::test]
async fn bot_messages_are_ignored() {
    let f = fixture(MockGateway::new(), default_policy()).await;
    let event = MessageEvent::new("C1", "bob", "help me please", "1.0").from_bot();
    assert_eq!(f.router.handle_message(&event).await, Outcome::Ignored);
    assert!(f.gateway.sent().is_empty());
}

#[tokio::test]
async fn unmonitored_channels_are_ignored() {
    let f = fixture(MockGateway::new(), default_policy()).await;
    let event = MessageEvent::new("C9", "bob", "!ping help me", "1.0");
    assert_eq!(f.router.handle_message(&event).await, Outcome::Ignored);
    assert!(f.gateway.sent().is_empty());
}

#[tokio::test]
async fn empty_text_is_ignored() {
    let f = fixture(MockGateway::new(), default_policy()).await;
    let event = MessageEvent::new("C1", "bob", "", "1.0");
    assert_eq!(f.router.handle_message(&event).await, Outcome::Ignored);
    assert!(f.gateway.sent().is_empty());
}

#[tokio::test]
async fn ignored_users_never_get_replies() {
    let mut policy = default_policy();
    policy.ignored_users = to_set(&["mallory"]);
    let f = fixture(MockGateway::new(), policy).await;
    let event = MessageEvent::new("C1", "mallory", "help me", "1.0");
    assert_eq!(f.router.handle_message(&event).await, Outcome::Ignored);
    assert!(f.gateway.sent().is_empty());
}

#[tokio::test]
async fn exact_command_executes_even_for_admins() {
    let gateway = MockGateway::new().with_group("eng", &["alice"]);
    let f = fixture(gateway, default_policy()).await;

    let event = MessageEvent::new("C1", "alice", "  !Ping ", "1.0");
    assert_eq!(
        f.router.handle_message(&event).await,
        Outcome::CommandExecuted("!ping".to_string())
    );

    let sent = f.gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].delivery, Delivery::Channel);
    assert_eq!(sent[0].message.text.as_deref(), Some("pong"));
    // no thread given, so the reply goes to the main channel
    assert_eq!(sent[0].message.thread_ts, None);
}

#[tokio::test]
async fn command_in_thread_replies_in_that_thread() {
    let f = fixture(MockGateway::new(), default_policy()).await;
    let event = MessageEvent::new("C1", "bob", "!faq", "5.0").with_thread_ts("2.0");
    assert_eq!(
        f.router.handle_message(&event).await,
        Outcome::CommandExecuted("!faq".to_string())
    );
    let sent = f.gateway.sent();
    assert_eq!(sent[0].message.thread_ts.as_deref(), Some("2.0"));
}

#[tokio::test]
async fn command_takes_priority_over_trigger_words() {
    // "!help" contains no trigger here, but "!commands" could collide with
    // a trigger substring; exact command match must win.
    let mut policy = default_policy();
    policy.triggers = to_set(&["command"]);
    let f = fixture(MockGateway::new(), policy).await;
    let event = MessageEvent::new("C1", "bob", "!commands", "1.0");
    assert_eq!(
        f.router.handle_message(&event).await,
        Outcome::CommandExecuted("!commands".to_string())
    );
}

#[tokio::test]
async fn trigger_word_informs_non_admin_in_new_thread() {
    let gateway = MockGateway::new().with_group("eng", &["alice"]);
    let f = fixture(gateway, default_policy()).await;

    let event = MessageEvent::new("C1", "bob", "I need help me please", "42.7");
    assert_eq!(
        f.router.handle_message(&event).await,
        Outcome::OnboardTriggered("help me".to_string())
    );

    let sent = f.gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].delivery, Delivery::Channel);
    assert_eq!(sent[0].message.user, "bob");
    // no existing thread, so the reply roots a thread at the event ts
    assert_eq!(sent[0].message.thread_ts.as_deref(), Some("42.7"));
}

#[tokio::test]
async fn trigger_reply_joins_existing_thread() {
    let f = fixture(MockGateway::new(), default_policy()).await;
    let event = MessageEvent::new("C1", "bob", "HELP ME", "42.7").with_thread_ts("40.0");
    assert_eq!(
        f.router.handle_message(&event).await,
        Outcome::OnboardTriggered("help me".to_string())
    );
    let sent = f.gateway.sent();
    assert_eq!(sent[0].message.thread_ts.as_deref(), Some("40.0"));
}

#[tokio::test]
async fn admins_bypass_trigger_replies_when_enabled() {
    let gateway = MockGateway::new().with_group("eng", &["alice"]);
    let f = fixture(gateway, default_policy()).await;
    let event = MessageEvent::new("C1", "alice", "help me", "1.0");
    assert_eq!(f.router.handle_message(&event).await, Outcome::Ignored);
    assert!(f.gateway.sent().is_empty());
}

#[tokio::test]
async fn admins_get_trigger_replies_when_bypass_disabled() {
    let mut policy = default_policy();
    policy.admins_bypass_triggers = false;
    let gateway = MockGateway::new().with_group("eng", &["alice"]);
    let f = fixture(gateway, policy).await;
    let event = MessageEvent::new("C1", "alice", "help me", "1.0");
    assert_eq!(
        f.router.handle_message(&event).await,
        Outcome::OnboardTriggered("help me".to_string())
    );
    assert_eq!(f.gateway.sent().len(), 1);
}

#[tokio::test]
async fn plain_chatter_is_ignored() {
    let f = fixture(MockGateway::new(), default_policy()).await;
    let event = MessageEvent::new("C1", "bob", "nice weather today", "1.0");
    assert_eq!(f.router.handle_message(&event).await, Outcome::Ignored);
    assert!(f.gateway.sent().is_empty());
}

#[tokio::test]
async fn commands_listing_reaches_the_channel() {
    let f = fixture(MockGateway::new(), default_policy()).await;
    let event = MessageEvent::new("C1", "bob", "!commands", "1.0");
    assert_eq!(
        f.router.handle_message(&event).await,
        Outcome::CommandExecuted("!commands".to_string())
    );
    let sent = f.gateway.sent();
    let listing = sent[0].message.text.as_deref().unwrap();
    for token in ["!welcome", "!onboard", "!faq", "!question", "!ping", "!commands", "!help"] {
        assert!(listing.contains(token), "listing missing {}", token);
    }
    assert_eq!(sent[0].message.thread_ts, None);
}

#[tokio::test]
async fn unknown_command_at_execution_is_a_logged_noop() {
    let f = fixture(MockGateway::new(), default_policy()).await;
    f.router
        .execute_command("!nope", "bob", "C1", None)
        .await;
    assert!(f.gateway.sent().is_empty());
}

#[tokio::test]
async fn failed_group_lookup_skips_that_group_only() {
    let gateway = MockGateway::new()
        .with_group("eng", &["alice"])
        .with_failing_group("ops");
    let f = fixture(gateway, default_policy()).await;
    assert!(f.registry.is_admin("alice").await);
    assert!(f.registry.is_admin("root").await);
    assert!(!f.registry.is_admin("carol").await);
}

#[tokio::test]
async fn group_update_replaces_and_empty_update_is_rejected() {
    let gateway = MockGateway::new().with_group("eng", &["alice"]);
    let f = fixture(gateway, default_policy()).await;

    assert!(!f.registry.handle_group_update("eng", HashSet::new()).await);
    assert!(f.registry.is_admin("alice").await);

    assert!(f.registry.handle_group_update("eng", to_set(&["carol"])).await);
    assert!(!f.registry.is_admin("alice").await);
    assert!(f.registry.is_admin("carol").await);
}

async fn dispatcher_fixture(filter_joins: bool) -> (Arc<MockGateway>, Dispatcher<MockGateway>) {
    let gateway = Arc::new(MockGateway::new().with_group("eng", &["alice"]));
    let registry = Arc::new(
        AdminRegistry::initialize(gateway.as_ref(), &to_set(&["eng"]), to_set(&["root"])).await,
    );
    let onboarder = Arc::new(Onboarder::new(gateway.clone(), DEFAULT_FAQ_URL));
    let router = Router::new(
        gateway.clone(),
        registry.clone(),
        onboarder.clone(),
        CommandTable::build(DEFAULT_FAQ_URL),
        default_policy(),
    );
    let dispatcher = Dispatcher::new(router, onboarder, registry, to_set(&["C1"]), filter_joins);
    (gateway, dispatcher)
}

#[tokio::test]
async fn member_join_sends_unthreaded_ephemeral_welcome() {
    let (gateway, dispatcher) = dispatcher_fixture(false).await;
    dispatcher
        .dispatch(Event::MemberJoinedChannel {
            channel: "C2".to_string(),
            user: "newbie".to_string(),
        })
        .await;
    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].delivery, Delivery::Ephemeral);
    assert_eq!(sent[0].message.user, "newbie");
    assert_eq!(sent[0].message.thread_ts, None);
    assert!(!sent[0].message.blocks.is_empty());
}

#[tokio::test]
async fn join_filter_drops_unmonitored_channels_when_enabled() {
    let (gateway, dispatcher) = dispatcher_fixture(true).await;
    dispatcher
        .dispatch(Event::MemberJoinedChannel {
            channel: "C2".to_string(),
            user: "newbie".to_string(),
        })
        .await;
    assert!(gateway.sent().is_empty());

    dispatcher
        .dispatch(Event::MemberJoinedChannel {
            channel: "C1".to_string(),
            user: "newbie".to_string(),
        })
        .await;
    assert_eq!(gateway.sent().len(), 1);
}

#[tokio::test]
async fn subteam_updates_bypass_the_router() {
    let (gateway, dispatcher) = dispatcher_fixture(false).await;
    dispatcher
        .dispatch(Event::SubteamUpdated {
            subteam_id: "eng".to_string(),
            users: to_set(&["dave"]),
        })
        .await;
    // membership change reaches the registry without any outbound send
    assert!(gateway.sent().is_empty());

    let event = MessageEvent::new("C1", "dave", "help me", "1.0");
    dispatcher.dispatch(Event::Message(event)).await;
    assert!(gateway.sent().is_empty(), "dave is now an admin and bypasses triggers");
}
