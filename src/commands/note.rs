//! Notes: `.note bob see you at noon` leaves a message that is handed to
//! bob the next time he says anything.

use super::{Command, CommandResult, Processor, Reply};
use crate::db::{Database, Note};
use crate::error::HandlerError;
use crate::user::User;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

pub const USAGE: &str = "usage: note <nick> <message>";

pub struct NoteCommand {
    db: Database,
}

impl NoteCommand {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Two replies per pending note. The notes are marked delivered
    /// together once every reply is built; on failure they all stay
    /// pending.
    async fn deliver(&self, user: &User) -> CommandResult {
        let pending = self.db.notes().pending_for(&user.nick).await?;
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let mut replies = Vec::with_capacity(pending.len() * 2);
        let mut ids = Vec::with_capacity(pending.len());
        for note in &pending {
            replies.push(Reply::to(user, header(&user.nick, note)));
            replies.push(Reply::to(user, note.body.clone()));
            ids.push(note.id);
        }
        self.db.notes().mark_delivered(&ids).await?;

        info!(nick = %user.nick, count = ids.len(), "Notes delivered");
        Ok(replies)
    }
}

fn format_when(sent_at: i64) -> String {
    DateTime::<Utc>::from_timestamp(sent_at, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| sent_at.to_string())
}

fn header(nick: &str, note: &Note) -> String {
    format!(
        "{} you have a note from {} at {}",
        nick,
        note.from,
        format_when(note.sent_at)
    )
}

#[async_trait]
impl Command for NoteCommand {
    fn name(&self) -> &'static str {
        "note"
    }

    async fn execute(&self, user: &User, args: &str) -> CommandResult {
        if args.is_empty() {
            return self.deliver(user).await;
        }

        let (to, body) = match args.split_once(' ') {
            Some((to, body)) => (to.trim(), body.trim()),
            None => (args.trim(), ""),
        };
        if body.is_empty() {
            return Err(HandlerError::Parse(USAGE.to_string()));
        }

        self.db.notes().store(&user.nick, to, body).await?;
        info!(from = %user.nick, to = %to, "Note stored");
        Ok(vec![Reply::to(user, format!("note stored for {}.", to))])
    }
}

#[async_trait]
impl Processor for NoteCommand {
    fn should_process(&self, _message: &str) -> bool {
        true
    }

    async fn process(&self, user: &User, _message: &str) -> CommandResult {
        self.deliver(user).await
    }
}
