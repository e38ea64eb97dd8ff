use serde::Serialize;

/// A single rich-content block in the platform's layout format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Section { text: MarkdownText },
    Divider,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownText {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl ContentBlock {
    /// A markdown section block.
    pub fn section(text: impl Into<String>) -> Self {
        ContentBlock::Section {
            text: MarkdownText {
                kind: "mrkdwn",
                text: text.into(),
            },
        }
    }

    pub fn divider() -> Self {
        ContentBlock::Divider
    }
}

/// An immutable response payload: plain text and/or content blocks.
///
/// Built once at startup; never merged or mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub text: Option<String>,
    pub blocks: Vec<ContentBlock>,
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            blocks: Vec::new(),
        }
    }

    pub fn blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            text: None,
            blocks,
        }
    }

    pub fn block(block: ContentBlock) -> Self {
        Self::blocks(vec![block])
    }
}

/// A fully composed outbound message, ready for the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub channel: String,
    /// Display identity the message is posted as.
    pub username: String,
    pub icon_emoji: String,
    /// Target user; required for ephemeral delivery.
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<ContentBlock>,
}

impl OutboundMessage {
    pub fn new(channel: impl Into<String>, user: impl Into<String>) -> Self {
        let user = user.into();
        Self {
            channel: channel.into(),
            username: user.clone(),
            icon_emoji: ":robot_face:".to_string(),
            user,
            thread_ts: None,
            text: None,
            blocks: Vec::new(),
        }
    }

    pub fn in_thread(mut self, thread_ts: impl Into<String>) -> Self {
        let thread_ts = thread_ts.into();
        if !thread_ts.is_empty() {
            self.thread_ts = Some(thread_ts);
        }
        self
    }

    pub fn with_response(mut self, response: &Response) -> Self {
        self.text = response.text.clone();
        self.blocks = response.blocks.clone();
        self
    }

    pub fn with_block(mut self, block: ContentBlock) -> Self {
        self.blocks.push(block);
        self
    }
}
