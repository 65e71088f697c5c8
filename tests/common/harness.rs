//! Dispatcher harness.

#![allow(dead_code)]

use automaton::commands::{Registry, Reply, default_registry};
use automaton::{Database, Dispatcher};
use std::sync::Arc;

pub const BOT_NICK: &str = "automaton";
pub const OPERATOR: &str = "#ops";
pub const CHANNEL: &str = "#bots";

/// A dispatcher wired to a fresh in-memory database.
pub struct Harness {
    pub db: Database,
    pub dispatcher: Dispatcher,
}

impl Harness {
    /// The full production command set.
    pub async fn new() -> Self {
        let db = Database::new(":memory:").await.expect("in-memory database");
        let registry = default_registry(&db, "slashnet").expect("registry");
        Self::from_parts(db, registry)
    }

    /// A custom registry built against a fresh database.
    pub async fn with_registry<F>(build: F) -> Self
    where
        F: FnOnce(&Database) -> Registry,
    {
        let db = Database::new(":memory:").await.expect("in-memory database");
        let registry = build(&db);
        Self::from_parts(db, registry)
    }

    fn from_parts(db: Database, registry: Registry) -> Self {
        let dispatcher = Dispatcher::new(Arc::new(registry), db.clone(), BOT_NICK, ".", OPERATOR);
        Self { db, dispatcher }
    }

    /// `nick` says `text` on the test channel.
    pub async fn say(&self, nick: &str, text: &str) -> Vec<Reply> {
        self.dispatcher.on_message(nick, Some(CHANNEL), text).await
    }

    /// `nick` says `text` in a private query.
    pub async fn query(&self, nick: &str, text: &str) -> Vec<Reply> {
        self.dispatcher.on_message(nick, None, text).await
    }

    /// Bodies of the replies for `text` on the test channel.
    pub async fn say_bodies(&self, nick: &str, text: &str) -> Vec<String> {
        self.say(nick, text).await.into_iter().map(|r| r.body).collect()
    }

    /// Give `nick` a stored identity.
    pub async fn trust(&self, nick: &str, level: i64) {
        sqlx::query(
            "INSERT INTO users (nick, host_mask, trust_level, nick_trusted) VALUES (?, NULL, ?, 1)",
        )
        .bind(nick)
        .bind(level)
        .execute(self.db.pool())
        .await
        .expect("seed user");
    }
}
