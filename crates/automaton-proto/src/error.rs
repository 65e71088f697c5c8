//! Error types for line framing and message parsing.

use thiserror::Error;

/// Convenience alias for results carrying a [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while reading or writing IRC lines.
///
/// Only [`ProtocolError::Io`] ends a stream; the rest describe one line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error on the underlying stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line contained a control character that IRC forbids.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// A complete line could not be parsed as a message.
    #[error("invalid message: {string}: {cause}")]
    InvalidMessage {
        /// The raw line.
        string: String,
        /// Why it was rejected.
        #[source]
        cause: MessageParseError,
    },
}

/// Reasons a line is not a well-formed IRC message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageParseError {
    /// The input was empty after trimming line endings.
    #[error("empty message")]
    EmptyMessage,

    /// The command token was missing or malformed.
    #[error("invalid command")]
    InvalidCommand,

    /// A command was recognised but lacked required parameters.
    #[error("{command} needs at least {expected} parameter(s)")]
    MissingParams {
        /// Command name.
        command: &'static str,
        /// Minimum parameter count.
        expected: usize,
    },

    /// Parser rejected the input at a position.
    #[error("parse error at position {0}")]
    Syntax(usize),
}

/// BEL and the other C0 controls except the formatting codes IRC clients use
/// (bold, color, italic, CTCP delimiter and friends) plus CR/LF.
pub(crate) fn is_illegal_control_char(ch: char) -> bool {
    matches!(ch, '\x00'..='\x1f')
        && !matches!(
            ch,
            '\x00' | '\x01' | '\x02' | '\x03' | '\x04' | '\x0f' | '\x11' | '\x16' | '\x1d'
                | '\x1e' | '\x1f' | '\r' | '\n'
        )
}
