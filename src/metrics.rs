//! Prometheus metrics.
//!
//! - `bot_commands_total{command}` - Commands executed by keyword
//! - `bot_command_duration_seconds{command}` - Command latency histogram
//! - `bot_command_errors_total{command,kind}` - Handler failures by kind
//! - `bot_processor_runs_total{processor}` - Passive processor invocations
//! - `bot_messages_sent_total` - Lines written to the network
//! - `bot_reconnects_total` - Reconnect attempts

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Lines sent to the network.
pub static MESSAGES_SENT: OnceLock<IntCounter> = OnceLock::new();

/// Reconnect attempts after a lost or failed connection.
pub static RECONNECTS: OnceLock<IntCounter> = OnceLock::new();

/// Commands executed by keyword.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command latency by keyword.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Handler failures by keyword and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Processor invocations by name.
pub static PROCESSOR_RUNS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Called once at startup. Recording before `init` is a no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(MESSAGES_SENT, IntCounter::new("bot_messages_sent_total", "Lines sent to the network"));
    register!(RECONNECTS, IntCounter::new("bot_reconnects_total", "Reconnect attempts"));
    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("bot_commands_total", "Commands executed by keyword"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("bot_command_duration_seconds", "Command latency by keyword")
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("bot_command_errors_total", "Handler failures by keyword and kind"), &["command", "kind"]));
    register!(PROCESSOR_RUNS, IntCounterVec::new(Opts::new("bot_processor_runs_total", "Passive processor invocations"), &["processor"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a handler failure.
#[inline]
pub fn record_command_error(command: &str, kind: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, kind]).inc();
    }
}

#[inline]
pub fn record_processor_run(processor: &str) {
    if let Some(c) = PROCESSOR_RUNS.get() {
        c.with_label_values(&[processor]).inc();
    }
}

#[inline]
pub fn record_message_sent() {
    if let Some(c) = MESSAGES_SENT.get() {
        c.inc();
    }
}

#[inline]
pub fn record_reconnect() {
    if let Some(c) = RECONNECTS.get() {
        c.inc();
    }
}
