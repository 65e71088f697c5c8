//! "your mom" archive. Every unique line mentioning your mom is kept;
//! `.yourmom` plays one back.

use super::{Command, CommandResult, Processor, Reply};
use crate::db::Database;
use crate::error::HandlerError;
use crate::user::User;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::debug;

pub const NOT_UNIQUE: &str = "0/10 that is not a unique 'your mom'";
pub const EMPTY: &str = "No your moms found.";

pub struct YourMomCommand {
    db: Database,
}

impl YourMomCommand {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Command for YourMomCommand {
    fn name(&self) -> &'static str {
        "yourmom"
    }

    async fn execute(&self, user: &User, _args: &str) -> CommandResult {
        let ids = self.db.insults().all_ids().await?;
        let chosen = ids.choose(&mut rand::thread_rng()).copied();
        let Some(id) = chosen else {
            return Ok(vec![Reply::to(user, EMPTY)]);
        };

        let text = self
            .db
            .insults()
            .find_text(id)
            .await?
            .ok_or_else(|| HandlerError::Internal(format!("insult {} vanished", id)))?;
        Ok(vec![Reply::to(user, text)])
    }
}

#[async_trait]
impl Processor for YourMomCommand {
    fn should_process(&self, message: &str) -> bool {
        message.to_lowercase().contains("your mom")
    }

    async fn process(&self, user: &User, message: &str) -> CommandResult {
        let line = message.to_lowercase();
        if self.db.insults().exists(&line).await? {
            return Ok(vec![Reply::to(user, NOT_UNIQUE)]);
        }

        self.db.insults().insert(&line).await?;
        debug!(nick = %user.nick, "Archived a new your mom");
        Ok(Vec::new())
    }
}
