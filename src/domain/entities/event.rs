use std::collections::HashSet;

/// A platform event after boundary decoding.
///
/// The event envelope is decoded exactly once at the adapter boundary;
/// the core only ever sees this tagged form, never a raw JSON map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A user joined a channel the bot can see.
    MemberJoinedChannel { channel: String, user: String },
    /// A message was posted to a channel.
    Message(MessageEvent),
    /// An admin subteam's membership changed.
    SubteamUpdated {
        subteam_id: String,
        users: HashSet<String>,
    },
}

/// A posted message as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub channel: String,
    pub user: String,
    pub text: String,
    pub ts: String,
    pub thread_ts: Option<String>,
    /// Set when the sender is a bot (possibly this one).
    pub from_bot: bool,
    pub subtype: Option<String>,
}

impl MessageEvent {
    pub fn new(
        channel: impl Into<String>,
        user: impl Into<String>,
        text: impl Into<String>,
        ts: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            user: user.into(),
            text: text.into(),
            ts: ts.into(),
            thread_ts: None,
            from_bot: false,
            subtype: None,
        }
    }

    pub fn with_thread_ts(mut self, thread_ts: impl Into<String>) -> Self {
        self.thread_ts = Some(thread_ts.into());
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn from_bot(mut self) -> Self {
        self.from_bot = true;
        self
    }

    /// The thread a reply to this message belongs in: the existing thread
    /// if there is one, otherwise a new thread rooted at this message.
    pub fn reply_thread(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }
}
