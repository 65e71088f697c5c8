//! Telemetry utilities for command timing.

use std::time::Instant;

/// Guard for timing command execution and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    command: &'static str,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(self.command, duration);
    }
}

/// Span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// One IRC connection attempt.
    pub fn connection(server: &str, attempt: u32) -> Span {
        info_span!("bot.connection", server = %server, attempt)
    }

    /// One command execution.
    pub fn command(name: &str, nick: &str, target: &str) -> Span {
        debug_span!("bot.command", command = %name, nick = %nick, target = %target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_records_on_drop() {
        crate::metrics::init();
        {
            let _timer = CommandTimer::new("timer-test");
        }
        assert!(crate::metrics::gather_metrics().contains("timer-test"));
    }
}
