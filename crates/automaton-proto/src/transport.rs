//! Framed IRC transport over TCP.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::Framed;
use tracing::trace;

use crate::error::ProtocolError;
use crate::irc::IrcCodec;
use crate::Message;

/// A connected, line-framed IRC stream.
pub struct Transport {
    framed: Framed<TcpStream, IrcCodec>,
}

impl Transport {
    /// Wrap an already connected stream.
    pub fn tcp(stream: TcpStream) -> Self {
        Self {
            framed: Framed::new(stream, IrcCodec::new()),
        }
    }

    /// Open a TCP connection to `addr`.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::tcp(stream))
    }

    /// Read the next message. `Ok(None)` means the peer closed the stream.
    ///
    /// A line that fails to parse comes back as an error and the stream
    /// stays usable; only [`ProtocolError::Io`] is fatal.
    pub async fn read_message(&mut self) -> Result<Option<Message>, ProtocolError> {
        match self.framed.next().await {
            Some(Ok(Ok(msg))) => {
                trace!(raw = %msg, "recv");
                Ok(Some(msg))
            }
            Some(Ok(Err(e))) | Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    /// Write and flush one message.
    pub async fn write_message(&mut self, msg: Message) -> Result<(), ProtocolError> {
        trace!(raw = %msg, "send");
        self.framed.send(msg).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Command;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn exchanges_lines_with_peer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut lines = BufReader::new(read).lines();
            let first = lines.next_line().await.unwrap().unwrap();
            write.write_all(b"PING :abc\r\n").await.unwrap();
            first
        });

        let mut transport = Transport::connect(addr).await.unwrap();
        transport
            .write_message(Command::NICK("automaton".into()).into())
            .await
            .unwrap();
        let msg = transport.read_message().await.unwrap().unwrap();

        assert_eq!(msg.command, Command::PING("abc".into(), None));
        assert_eq!(server.await.unwrap(), "NICK automaton");
    }
}
