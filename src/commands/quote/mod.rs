//! Quote archive.
//!
//! `.quote <pasted transcript>` stores a quote, `.quote [nick] [/text/]`
//! replays a random matching one.

pub mod extract;
pub mod search;

use super::{Command, CommandResult, Reply};
use crate::db::{Database, NewQuote};
use crate::error::HandlerError;
use crate::user::User;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use search::{QuoteFilter, has_search_pair};
use tracing::{debug, info};

/// Schema tag stamped on every stored quote.
pub const SCHEMA_VERSION: &str = "1";

pub const NO_QUOTES: &str = "No quotes found.";
pub const STORED: &str = "quote stored.";
pub const UNPARSEABLE: &str = "I couldn't parse the quote correctly.";

pub struct QuoteCommand {
    db: Database,
    network: String,
}

impl QuoteCommand {
    pub fn new(db: Database, network: impl Into<String>) -> Self {
        Self {
            db,
            network: network.into(),
        }
    }

    async fn store(&self, user: &User, args: &str, tokens: &[&str]) -> CommandResult {
        let Some(parsed) = extract::parse_quote(args, tokens) else {
            debug!(nick = %user.nick, args = %args, "No nick found in quote");
            return Err(HandlerError::Parse(UNPARSEABLE.to_string()));
        };

        let id = self
            .db
            .quotes()
            .insert(NewQuote {
                nicknames: &parsed.nicknames,
                text: &parsed.text,
                network: &self.network,
                schema_version: SCHEMA_VERSION,
            })
            .await?;

        info!(
            id,
            nick = %user.nick,
            nicknames = ?parsed.nicknames,
            "Quote stored"
        );
        Ok(vec![Reply::to(user, STORED)])
    }

    /// Ids of every quote the filter selects.
    pub async fn find_ids(&self, filter: &QuoteFilter) -> Result<Vec<i64>, HandlerError> {
        let candidates = self
            .db
            .quotes()
            .candidates(&filter.network, filter.nick.as_deref())
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|(_, text)| filter.matches_text(text))
            .map(|(id, _)| id)
            .collect())
    }

    async fn retrieve(&self, user: &User, args: &str) -> CommandResult {
        let filter = QuoteFilter::parse(&self.network, args);
        let ids = self.find_ids(&filter).await?;

        let chosen = ids.choose(&mut rand::thread_rng()).copied();
        let Some(id) = chosen else {
            return Ok(vec![Reply::to(user, NO_QUOTES)]);
        };

        debug!(id, matches = ids.len(), "Quote selected");
        let text = self
            .db
            .quotes()
            .find_text(id)
            .await?
            .ok_or_else(|| HandlerError::Internal(format!("quote {} vanished", id)))?;

        Ok(vec![Reply::to(user, text)])
    }
}

#[async_trait]
impl Command for QuoteCommand {
    fn name(&self) -> &'static str {
        "quote"
    }

    async fn execute(&self, user: &User, args: &str) -> CommandResult {
        let tokens = extract::split_args(args);
        if tokens.len() > 1 && !has_search_pair(args) {
            self.store(user, args, &tokens).await
        } else {
            self.retrieve(user, args).await
        }
    }
}
