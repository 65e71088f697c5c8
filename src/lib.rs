//! automaton - an IRC automation bot.
//!
//! Lines arriving on a channel are either commands (`.quote`, `.karma`,
//! ...) routed to a single handler, or chatter offered to passive
//! processors (karma counting, note delivery, the "your mom" archive).

pub mod client;
pub mod commands;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod metrics;
pub mod telemetry;
pub mod user;

pub use commands::{Command, Processor, Registry, RegistryBuilder, Reply};
pub use config::Config;
pub use db::Database;
pub use dispatch::Dispatcher;
pub use error::HandlerError;
pub use user::User;
