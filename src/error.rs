//! Handler error types.
//!
//! Handlers return `Result<Vec<Reply>, HandlerError>`. The dispatcher
//! pattern-matches on the error: parse failures go back to the user as a
//! plain reply, everything else is a fault that earns an apology and an
//! operator diagnostic.

use crate::db::DbError;
use thiserror::Error;

/// Errors a command or processor can return.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The user's input could not be understood. The message is shown to
    /// them verbatim and nothing is escalated.
    #[error("{0}")]
    Parse(String),

    #[error("storage failure: {0}")]
    Db(#[from] DbError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Static label for metrics.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Db(_) => "db",
            Self::Internal(_) => "internal",
        }
    }

    /// True for errors that go through the apology/diagnostic path.
    pub fn is_fault(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }

    /// Diagnostic lines for the operator: culprit and message first, then
    /// up to three levels of the source chain. A level whose text is
    /// already shown is skipped.
    pub fn diagnostic(&self, culprit: &str) -> Vec<String> {
        let mut lines = vec![format!("{} caused {}", culprit, self)];
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            if lines.len() > 3 {
                break;
            }
            let text = cause.to_string();
            if !lines.iter().any(|line| line.contains(&text)) {
                lines.push(format!("  at {}", text));
            }
            source = cause.source();
        }
        lines
    }
}
