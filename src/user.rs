//! Per-message sender identity.

/// The sender of a message, as resolved against the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub nick: String,
    pub host_mask: Option<String>,
    /// 0 means untrusted.
    pub trust_level: u32,
    pub nick_trusted: bool,
    /// Channel the message arrived on; `None` for private queries.
    pub channel: Option<String>,
}

impl User {
    /// An identity with no stored record.
    pub fn anonymous(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            host_mask: None,
            trust_level: 0,
            nick_trusted: false,
            channel: None,
        }
    }

    pub fn with_channel(mut self, channel: Option<&str>) -> Self {
        self.channel = channel.map(str::to_string);
        self
    }

    /// Where replies to this user go: the channel if there is one,
    /// otherwise a private message.
    pub fn reply_target(&self) -> &str {
        self.channel.as_deref().unwrap_or(&self.nick)
    }
}
