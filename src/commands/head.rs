//! `.head <url>`: status line and `Server` header of a URL.

use super::{Command, CommandResult, Reply};
use crate::error::HandlerError;
use crate::user::User;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};

pub const USAGE: &str = "usage: head <url>";

const HEAD_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HeadCommand {
    http_client: reqwest::Client,
}

impl Default for HeadCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadCommand {
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(HEAD_TIMEOUT)
            .user_agent(concat!("automaton/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http_client }
    }
}

/// Prepend `http://` when no scheme is given and parse.
pub fn normalize_url(raw: &str) -> Result<Url, HandlerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(HandlerError::Parse(USAGE.to_string()));
    }

    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    Url::parse(&with_scheme)
        .map_err(|e| HandlerError::Parse(format!("bad url {}: {}", raw, e)))
}

#[async_trait]
impl Command for HeadCommand {
    fn name(&self) -> &'static str {
        "head"
    }

    async fn execute(&self, user: &User, args: &str) -> CommandResult {
        let url = normalize_url(args)?;
        debug!(url = %url, "HEAD");

        let response = match self.http_client.head(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "HEAD failed");
                return Ok(vec![Reply::to(user, format!("HEAD {} failed: {}", url, e))]);
            }
        };

        let status = response.status();
        let mut replies = vec![Reply::to(
            user,
            format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ),
        )];

        if let Some(server) = response
            .headers()
            .get(reqwest::header::SERVER)
            .and_then(|v| v.to_str().ok())
        {
            replies.push(Reply::to(user, format!("Server: {}", server)));
        }

        Ok(replies)
    }
}
