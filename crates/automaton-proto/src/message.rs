//! Owned IRC messages.

use std::fmt;
use std::str::FromStr;

use crate::command::Command;
use crate::error::{MessageParseError, ProtocolError};
use crate::parse::ParsedMessage;
use crate::prefix::Prefix;

/// A complete IRC message.
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    /// Raw IRCv3 tag section (without the leading `@`), kept verbatim.
    pub tags: Option<String>,
    /// Message source.
    pub prefix: Option<Prefix>,
    /// Command and parameters.
    pub command: Command,
}

impl Message {
    /// `PRIVMSG target :text`
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Command::PRIVMSG(target.into(), text.into()).into()
    }

    /// `JOIN channel`
    pub fn join(channel: impl Into<String>) -> Self {
        Command::JOIN(channel.into(), None).into()
    }

    /// Nickname of the sender, if the prefix is a user mask.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message {
            tags: None,
            prefix: None,
            command,
        }
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |cause: MessageParseError| ProtocolError::InvalidMessage {
            string: s.to_string(),
            cause,
        };

        let parsed = ParsedMessage::parse(s).map_err(invalid)?;
        let command = Command::new(parsed.command, &parsed.params).map_err(invalid)?;

        Ok(Message {
            tags: parsed.tags.map(str::to_string),
            prefix: parsed.prefix.map(Prefix::new_from_str),
            command,
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tags) = &self.tags {
            write!(f, "@{} ", tags)?;
        }
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        write!(f, "{}", self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_privmsg() {
        let msg: Message = ":Gnome!g@example.org PRIVMSG #bots :.quote <foo> hi"
            .parse()
            .unwrap();
        assert_eq!(msg.source_nickname(), Some("Gnome"));
        assert_eq!(
            msg.command,
            Command::PRIVMSG("#bots".into(), ".quote <foo> hi".into())
        );
    }

    #[test]
    fn server_prefix_has_no_nickname() {
        let msg: Message = ":irc.test 001 automaton :Welcome".parse().unwrap();
        assert_eq!(msg.source_nickname(), None);
    }

    #[test]
    fn display_includes_prefix_and_tags() {
        let msg = Message {
            tags: Some("msgid=1".into()),
            prefix: Some(Prefix::new("bot", "bot", "host")),
            command: Command::PRIVMSG("#a".into(), "two words".into()),
        };
        assert_eq!(msg.to_string(), "@msgid=1 :bot!bot@host PRIVMSG #a :two words");
    }

    #[test]
    fn malformed_line_reports_source() {
        let err = "PRIVMSG".parse::<Message>().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidMessage { .. }));
    }
}
