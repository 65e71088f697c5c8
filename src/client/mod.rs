//! IRC connection supervisor.
//!
//! Connects, registers, joins the configured channels and feeds every
//! `PRIVMSG` through the [`Dispatcher`]. When the connection drops the bot
//! reconnects forever, waiting a growing (bounded) delay between attempts.

mod backoff;

pub use backoff::Backoff;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::metrics;
use crate::telemetry::spans;
use automaton_proto::{
    ChannelExt, Command, ERR_NICKNAMEINUSE, Message, ProtocolError, RPL_WELCOME, Transport, irc_eq,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{Instrument, debug, info, warn};

/// Registration must finish within this window.
pub const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Silence after which the bot pings the server.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("connection closed by server")]
    Closed,
    #[error("registration timed out")]
    RegistrationTimeout,
}

/// The connection supervisor.
pub struct Bot {
    config: Arc<Config>,
    dispatcher: Arc<Dispatcher>,
}

impl Bot {
    pub fn new(config: Arc<Config>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Connect and serve forever.
    pub async fn run(&self) {
        let mut backoff = Backoff::new(
            self.config.reconnect.initial_delay(),
            self.config.reconnect.max_delay(),
        );
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.wrapping_add(1);
            let span = spans::connection(&self.config.server.address, attempt);

            match self.session(&mut backoff).instrument(span).await {
                Ok(()) => info!("Session ended"),
                Err(e) => warn!(error = %e, "Connection lost"),
            }

            let delay = backoff.next_delay();
            metrics::record_reconnect();
            info!(delay_secs = delay.as_secs(), "Reconnecting");
            sleep(delay).await;
        }
    }

    /// One connection from connect to disconnect. The backoff is reset
    /// once registration succeeds.
    pub async fn session(&self, backoff: &mut Backoff) -> Result<(), ClientError> {
        let address = &self.config.server.address;
        info!(server = %address, "Connecting");
        let mut transport = Transport::connect(address.as_str()).await?;

        let nick = self.register(&mut transport).await?;
        backoff.reset();
        info!(nick = %nick, "Registered");

        let dispatcher = if irc_eq(&nick, self.dispatcher.bot_nick()) {
            Arc::clone(&self.dispatcher)
        } else {
            Arc::new(self.dispatcher.with_bot_nick(nick.as_str()))
        };

        for channel in &self.config.server.channels {
            transport.write_message(Message::join(channel.as_str())).await?;
            info!(channel = %channel, "Joining");
        }

        loop {
            match timeout(IDLE_TIMEOUT, transport.read_message()).await {
                Ok(Ok(Some(message))) => handle_message(&dispatcher, &mut transport, message).await?,
                Ok(Ok(None)) => return Err(ClientError::Closed),
                Ok(Err(ProtocolError::Io(e))) => return Err(ClientError::Io(e)),
                Ok(Err(e)) => warn!(error = %e, "Dropping unreadable line"),
                Err(_) => {
                    debug!("Idle, sending keepalive");
                    transport
                        .write_message(Command::PING("keepalive".to_string(), None).into())
                        .await?;
                }
            }
        }
    }

    /// Send NICK/USER and wait for the welcome numeric. Returns the nick
    /// the server accepted.
    async fn register(&self, transport: &mut Transport) -> Result<String, ClientError> {
        let bot = &self.config.bot;

        transport.write_message(Command::NICK(bot.nick.clone()).into()).await?;
        transport
            .write_message(
                Command::USER(bot.username.clone(), "0".to_string(), bot.realname.clone()).into(),
            )
            .await?;

        timeout(REGISTRATION_TIMEOUT, await_welcome(transport, bot.nick.clone()))
            .await
            .map_err(|_| ClientError::RegistrationTimeout)?
    }
}

/// Relay a `PRIVMSG` through the dispatcher and answer `PING`. A reply
/// line the codec refuses to send is dropped; only I/O errors end the
/// session.
async fn handle_message(
    dispatcher: &Dispatcher,
    transport: &mut Transport,
    message: Message,
) -> Result<(), ClientError> {
    let sender = message.source_nickname().map(str::to_string);

    match message.command {
        Command::PING(token, _) => {
            transport.write_message(Command::PONG(token, None).into()).await?;
        }
        Command::PRIVMSG(target, text) => {
            let Some(sender) = sender else {
                return Ok(());
            };
            let channel = target.is_channel_name().then_some(target.as_str());

            let replies = dispatcher.on_message(&sender, channel, &text).await;
            for reply in replies {
                for line in reply.body.lines().filter(|l| !l.is_empty()) {
                    match transport
                        .write_message(Message::privmsg(reply.target.as_str(), line))
                        .await
                    {
                        Ok(()) => metrics::record_message_sent(),
                        Err(ProtocolError::Io(e)) => return Err(ClientError::Io(e)),
                        Err(e) => warn!(to = %reply.target, error = %e, "Dropping unsendable reply"),
                    }
                }
            }
        }
        _ => {}
    }

    Ok(())
}

/// Answer PINGs and nick collisions until the server welcomes us.
async fn await_welcome(transport: &mut Transport, mut nick: String) -> Result<String, ClientError> {
    loop {
        let message = match transport.read_message().await {
            Ok(Some(message)) => message,
            Ok(None) => return Err(ClientError::Closed),
            Err(ProtocolError::Io(e)) => return Err(ClientError::Io(e)),
            Err(e) => {
                warn!(error = %e, "Dropping unreadable line");
                continue;
            }
        };

        match &message.command {
            Command::Response(RPL_WELCOME, _) => return Ok(nick),
            Command::Response(ERR_NICKNAMEINUSE, _) => {
                nick.push('_');
                warn!(nick = %nick, "Nickname in use, retrying");
                transport.write_message(Command::NICK(nick.clone()).into()).await?;
            }
            Command::PING(token, _) => {
                transport.write_message(Command::PONG(token.clone(), None).into()).await?;
            }
            _ => debug!(raw = %message, "Registration traffic"),
        }
    }
}
