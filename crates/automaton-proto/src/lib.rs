//! # automaton-proto
//!
//! The slice of the IRC protocol a client-side bot needs: a line codec,
//! an owned message model with a nom-based parser, prefix handling and
//! RFC 1459 case mapping.
//!
//! ```rust
//! use automaton_proto::{Command, Message};
//!
//! let msg: Message = ":gnome!g@host PRIVMSG #chan :hello there".parse().unwrap();
//! assert_eq!(msg.source_nickname(), Some("gnome"));
//! assert!(matches!(msg.command, Command::PRIVMSG(ref t, ref x) if t == "#chan" && x == "hello there"));
//!
//! let reply = Message::privmsg("#chan", "hi");
//! assert_eq!(reply.to_string(), "PRIVMSG #chan hi");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod command;
pub mod error;
pub mod message;
mod parse;
pub mod prefix;

#[cfg(feature = "tokio")]
pub mod irc;
#[cfg(feature = "tokio")]
pub mod line;
#[cfg(feature = "tokio")]
pub mod transport;

pub use casemap::{irc_eq, irc_to_lower};
pub use chan::ChannelExt;
pub use command::{Command, RPL_WELCOME, ERR_NICKNAMEINUSE};
pub use error::{MessageParseError, ProtocolError};
pub use message::Message;
pub use prefix::Prefix;

#[cfg(feature = "tokio")]
pub use irc::IrcCodec;
#[cfg(feature = "tokio")]
pub use transport::Transport;
