//! Slack adapter - outbound Web API gateway and inbound event decoding

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::application::errors::GatewayError;
use crate::domain::entities::{Event, MessageEvent, OutboundMessage};
use crate::domain::traits::Gateway;

/// Slack Web API base URL
const API_BASE: &str = "https://slack.com/api";

/// Every Web API response carries this envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroupUsersResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    users: Vec<String>,
}

/// Outbound gateway backed by the Slack Web API.
pub struct SlackGateway {
    token: String,
    client: Client,
    base: String,
}

impl SlackGateway {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            base: API_BASE.to_string(),
        }
    }

    /// Point the gateway at a different API host, for tests.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.base, method)
    }

    async fn post(&self, method: &str, message: &OutboundMessage) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.api_url(method))
            .bearer_auth(&self.token)
            .json(message)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Network(format!(
                "Slack API error: {}",
                response.status()
            )));
        }

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        if !envelope.ok {
            return Err(GatewayError::Api(
                envelope.error.unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for SlackGateway {
    async fn send_message(&self, message: &OutboundMessage) -> Result<(), GatewayError> {
        tracing::debug!("chat.postMessage channel={}", message.channel);
        self.post("chat.postMessage", message).await
    }

    async fn send_ephemeral(&self, message: &OutboundMessage) -> Result<(), GatewayError> {
        tracing::debug!(
            "chat.postEphemeral channel={} user={}",
            message.channel,
            message.user
        );
        self.post("chat.postEphemeral", message).await
    }

    async fn list_group_members(&self, group: &str) -> Result<HashSet<String>, GatewayError> {
        let response = self
            .client
            .get(self.api_url("usergroups.users.list"))
            .bearer_auth(&self.token)
            .query(&[("usergroup", group)])
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Network(format!(
                "Slack API error: {}",
                response.status()
            )));
        }

        let data: GroupUsersResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        if !data.ok {
            return Err(GatewayError::Api(
                data.error.unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        Ok(data.users.into_iter().collect())
    }

    async fn probe(&self) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.api_url("api.test"))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        if !envelope.ok {
            return Err(GatewayError::Api(
                envelope.error.unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        Ok(())
    }
}

fn field(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}

/// Decode one event callback payload into a typed [`Event`].
///
/// Unknown event kinds and payloads missing required fields decode to
/// `None`; the caller treats both as "ignore", not as an error.
pub fn decode_event(payload: &Value) -> Option<Event> {
    let event = payload.get("event")?;
    match event.get("type")?.as_str()? {
        "member_joined_channel" => Some(Event::MemberJoinedChannel {
            channel: field(event, "channel")?,
            user: field(event, "user")?,
        }),
        "message" => {
            let mut message = MessageEvent::new(
                field(event, "channel")?,
                field(event, "user").unwrap_or_default(),
                field(event, "text").unwrap_or_default(),
                field(event, "ts")?,
            );
            if let Some(thread_ts) = field(event, "thread_ts") {
                message = message.with_thread_ts(thread_ts);
            }
            if let Some(subtype) = field(event, "subtype") {
                message = message.with_subtype(subtype);
            }
            if event.get("bot_profile").is_some_and(|v| !v.is_null()) {
                message = message.from_bot();
            }
            Some(Event::Message(message))
        }
        "subteam_updated" => {
            let subteam = event.get("subteam")?;
            let users: HashSet<String> = subteam
                .get("users")
                .and_then(Value::as_array)
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            Some(Event::SubteamUpdated {
                subteam_id: field(subteam, "id")?,
                users,
            })
        }
        _ => None,
    }
}
