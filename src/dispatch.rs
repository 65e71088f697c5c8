//! Message dispatch.
//!
//! Every `PRIVMSG` the bot sees goes through [`Dispatcher::on_message`]. A
//! line starting with the command prefix is routed to exactly one command;
//! anything else is offered to each processor in registration order.
//! Handler failures never escape: they become an apology to the user and a
//! diagnostic for the operator.

use crate::commands::{CommandResult, Registry, Reply};
use crate::db::Database;
use crate::metrics;
use crate::telemetry::{CommandTimer, spans};
use crate::user::User;
use automaton_proto::irc_eq;
use std::sync::Arc;
use tracing::{Instrument, debug, error, warn};

/// Split a prefixed line into keyword and arguments.
///
/// `None` when `text` does not start with `prefix`. Arguments are trimmed
/// and empty (never absent) when the keyword stands alone.
pub fn parse_command_line<'t>(prefix: &str, text: &'t str) -> Option<(&'t str, &'t str)> {
    let rest = text.strip_prefix(prefix)?;
    Some(match rest.split_once(' ') {
        Some((keyword, args)) => (keyword, args.trim()),
        None => (rest, ""),
    })
}

/// Routes inbound lines to handlers. Holds no mutable state.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    db: Database,
    bot_nick: String,
    prefix: String,
    operator: String,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<Registry>,
        db: Database,
        bot_nick: impl Into<String>,
        prefix: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            db,
            bot_nick: bot_nick.into(),
            prefix: prefix.into(),
            operator: operator.into(),
        }
    }

    pub fn bot_nick(&self) -> &str {
        &self.bot_nick
    }

    /// The same dispatcher, ignoring `nick` as the bot's own. Used when the
    /// server accepted a different nick than the configured one.
    pub fn with_bot_nick(&self, nick: impl Into<String>) -> Self {
        Self {
            bot_nick: nick.into(),
            ..self.clone()
        }
    }

    /// Handle one line from `sender`. `channel` is `None` for private
    /// queries. Returns the replies to send, in order.
    pub async fn on_message(&self, sender: &str, channel: Option<&str>, text: &str) -> Vec<Reply> {
        let user = self.resolve(sender).await.with_channel(channel);

        if irc_eq(&user.nick, &self.bot_nick) {
            return Vec::new();
        }

        match parse_command_line(&self.prefix, text) {
            Some((keyword, args)) => self.run_command(&user, keyword, args).await,
            None => self.run_processors(&user, text).await,
        }
    }

    async fn resolve(&self, sender: &str) -> User {
        match self.db.users().resolve(sender).await {
            Ok(user) => user,
            Err(e) => {
                warn!(nick = %sender, error = %e, "Identity lookup failed, treating sender as anonymous");
                User::anonymous(sender)
            }
        }
    }

    async fn run_command(&self, user: &User, keyword: &str, args: &str) -> Vec<Reply> {
        let Some(command) = self.registry.lookup(keyword) else {
            debug!(command = %keyword, nick = %user.nick, "Unknown command");
            return Vec::new();
        };

        if !command.authorized(user) {
            debug!(command = %keyword, nick = %user.nick, "Unauthorized command");
            return Vec::new();
        }

        let name = command.name();
        let span = spans::command(name, &user.nick, user.reply_target());
        let result = {
            let _timer = CommandTimer::new(name);
            command.execute(user, args).instrument(span).await
        };

        self.settle(user, name, result, true)
    }

    async fn run_processors(&self, user: &User, text: &str) -> Vec<Reply> {
        let mut replies = Vec::new();

        for entry in self.registry.processors() {
            if !entry.processor.should_process(text) {
                continue;
            }

            metrics::record_processor_run(entry.name);
            let result = entry.processor.process(user, text).await;
            replies.extend(self.settle(user, entry.name, result, false));
        }

        replies
    }

    /// Turn a handler result into replies. Parse failures go back to the
    /// user; faults are logged and reported to the operator, with an
    /// apology to the user only for explicit commands.
    fn settle(&self, user: &User, culprit: &str, result: CommandResult, apologize: bool) -> Vec<Reply> {
        let err = match result {
            Ok(replies) => return replies,
            Err(err) => err,
        };

        metrics::record_command_error(culprit, err.error_code());

        if !err.is_fault() {
            debug!(command = %culprit, nick = %user.nick, reason = %err, "Parse failure");
            return vec![Reply::to(user, err.to_string())];
        }

        error!(
            command = %culprit,
            nick = %user.nick,
            error = %err,
            kind = err.error_code(),
            "Handler failed"
        );

        let mut replies = Vec::new();
        if apologize {
            replies.push(Reply::to(
                user,
                format!("sorry {}, something broke.", user.nick),
            ));
        }
        replies.extend(err.diagnostic(&user.nick).into_iter().map(|line| Reply {
            target: self.operator.clone(),
            body: line,
        }));
        replies
    }
}
