//! Bot commands.
//!
//! A command is a keyword-triggered unit (`.quote`, `.karma`, ...). Some
//! commands also watch ambient chatter as processors. Handlers never send
//! anything themselves: they return the replies and the dispatcher routes
//! them.

pub mod head;
pub mod karma;
pub mod note;
pub mod quote;
pub mod registry;
pub mod yourmom;

pub use head::HeadCommand;
pub use karma::KarmaCommand;
pub use note::NoteCommand;
pub use quote::QuoteCommand;
pub use registry::{Registry, RegistryBuilder, RegistryError};
pub use yourmom::YourMomCommand;

use crate::db::Database;
use crate::error::HandlerError;
use crate::user::User;
use async_trait::async_trait;

/// A line of text to send back to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Channel or nick.
    pub target: String,
    pub body: String,
}

impl Reply {
    /// Reply to wherever `user`'s message came from.
    pub fn to(user: &User, body: impl Into<String>) -> Self {
        Self {
            target: user.reply_target().to_string(),
            body: body.into(),
        }
    }
}

/// Result of running a command or processor.
pub type CommandResult = Result<Vec<Reply>, HandlerError>;

/// A keyword-triggered command.
#[async_trait]
pub trait Command: Send + Sync {
    /// Keyword that follows the command prefix.
    fn name(&self) -> &'static str;

    fn authorized(&self, _user: &User) -> bool {
        true
    }

    /// Run with the (trimmed, possibly empty) argument string.
    async fn execute(&self, user: &User, args: &str) -> CommandResult;
}

/// A handler that also inspects every non-command line.
#[async_trait]
pub trait Processor: Send + Sync {
    fn should_process(&self, message: &str) -> bool;

    async fn process(&self, user: &User, message: &str) -> CommandResult;
}

/// The bot's full command set. Processors run in the order listed here.
pub fn default_registry(db: &Database, network: &str) -> Result<Registry, RegistryError> {
    Ok(Registry::builder()
        .command(QuoteCommand::new(db.clone(), network))?
        .processor(KarmaCommand::new(db.clone()))?
        .processor(NoteCommand::new(db.clone()))?
        .processor(YourMomCommand::new(db.clone()))?
        .command(HeadCommand::new())?
        .build())
}
