//! Message codec for tokio.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, is_illegal_control_char, ProtocolError};
use crate::line::LineCodec;
use crate::message::Message;

/// Frames lines with [`LineCodec`] and parses them into [`Message`]s.
#[derive(Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Codec with the default 512-byte limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }

    /// Truncate at the first line ending, reject illegal controls and
    /// terminate with CR LF. A reply body never smuggles a second command.
    pub fn sanitize(mut data: String) -> error::Result<String> {
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }
        if let Some(ch) = data.chars().find(|c| is_illegal_control_char(*c)) {
            return Err(ProtocolError::IllegalControlChar(ch));
        }
        data.push_str("\r\n");
        Ok(data)
    }
}

/// Each item is one line: a parse failure is yielded in place of that
/// message and the stream carries on.
impl Decoder for IrcCodec {
    type Item = error::Result<Message>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Self::Item>> {
        Ok(self.inner.decode(src)?.map(|line| line.parse::<Message>()))
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        let sanitized = Self::sanitize(msg.to_string())?;
        self.inner.encode(sanitized, dst)
    }
}
