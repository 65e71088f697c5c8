//! Karma: `thing++` / `thing--` in chatter, `.karma thing` to read it back.

use super::{Command, CommandResult, Processor, Reply};
use crate::db::Database;
use crate::user::User;
use async_trait::async_trait;
use tracing::debug;

pub struct KarmaCommand {
    db: Database,
}

impl KarmaCommand {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Item and delta for a `++`/`--` line.
pub fn parse_adjustment(message: &str) -> Option<(String, i64)> {
    let (rest, delta) = if let Some(rest) = message.strip_suffix("++") {
        (rest, 1)
    } else if let Some(rest) = message.strip_suffix("--") {
        (rest, -1)
    } else {
        return None;
    };

    let item = rest.to_lowercase();
    if item.trim().is_empty() {
        return None;
    }
    Some((item, delta))
}

#[async_trait]
impl Command for KarmaCommand {
    fn name(&self) -> &'static str {
        "karma"
    }

    async fn execute(&self, user: &User, args: &str) -> CommandResult {
        let item = args.to_lowercase();
        let value = self.db.karma().value(&item).await?;
        Ok(vec![Reply::to(user, format!("{}: {}", item, value))])
    }
}

#[async_trait]
impl Processor for KarmaCommand {
    fn should_process(&self, message: &str) -> bool {
        message.ends_with("++") || message.ends_with("--")
    }

    async fn process(&self, user: &User, message: &str) -> CommandResult {
        let Some((item, delta)) = parse_adjustment(message) else {
            return Ok(Vec::new());
        };

        let value = self.db.karma().adjust(&item, delta).await?;
        debug!(item = %item, delta, value, nick = %user.nick, "Karma adjusted");
        Ok(Vec::new())
    }
}
