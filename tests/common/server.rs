//! Fake IRC server.
//!
//! Accepts a single connection from the bot and lets a test script the
//! server side of the conversation line by line.

#![allow(dead_code)]

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

pub struct FakeServer {
    listener: TcpListener,
}

/// The server end of an accepted connection.
pub struct Peer {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl FakeServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn address(&self) -> String {
        self.listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_default()
    }

    pub async fn accept(&self) -> anyhow::Result<Peer> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        let (read, writer) = stream.into_split();
        Ok(Peer {
            reader: BufReader::new(read),
            writer,
        })
    }
}

impl Peer {
    /// Next line from the bot, without the line ending.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("bot closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read lines until one starts with `prefix`.
    pub async fn expect(&mut self, prefix: &str) -> anyhow::Result<String> {
        loop {
            let line = self.recv().await?;
            if line.starts_with(prefix) {
                return Ok(line);
            }
        }
    }

    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_bytes(line.as_bytes()).await
    }

    /// Send a line that need not be valid UTF-8.
    pub async fn send_bytes(&mut self, line: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(line).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Complete registration as `nick` and consume the JOINs for `channels`.
    pub async fn welcome(&mut self, nick: &str, channels: usize) -> anyhow::Result<()> {
        self.send(&format!(":irc.test 001 {} :Welcome", nick)).await?;
        for _ in 0..channels {
            self.expect("JOIN ").await?;
        }
        Ok(())
    }
}
