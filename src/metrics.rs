//! Prometheus metrics collection for parley.
//!
//! Metrics are registered once in [`init`] and served as text by
//! [`gather_metrics`]. Recording helpers are no-ops until `init` runs, so
//! library users and tests that never initialize metrics pay nothing.
//!
//! - `bot_command_total{command}` - Commands executed
//! - `bot_command_duration_seconds{command}` - Command latency histogram
//! - `bot_command_errors_total{command,error}` - Failed commands by error kind
//! - `bot_access_denied_total{command,reason}` - Role and channel denials
//! - `bot_store_ops_total{op,result}` - Store reads and writes

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Commands executed by primary alias.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command latency by primary alias.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Command errors by primary alias and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Commands refused by role or channel restrictions.
pub static ACCESS_DENIED: OnceLock<IntCounterVec> = OnceLock::new();

pub static STORE_OPS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup before serving `/metrics`. Repeated calls are harmless.
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
                    tracing::error!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("bot_command_total", "Commands executed by alias"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("bot_command_duration_seconds", "Command latency by alias")
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("bot_command_errors_total", "Command errors by alias and kind"), &["command", "error"]));
    register!(ACCESS_DENIED, IntCounterVec::new(Opts::new("bot_access_denied_total", "Commands refused by access checks"), &["command", "reason"]));
    register!(STORE_OPS, IntCounterVec::new(Opts::new("bot_store_ops_total", "Store operations by kind and outcome"), &["op", "result"]));
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

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

/// Record a role or channel denial.
#[inline]
pub fn record_access_denied(command: &str, reason: &str) {
    if let Some(c) = ACCESS_DENIED.get() {
        c.with_label_values(&[command, reason]).inc();
    }
}

/// Record a store read or write.
#[inline]
pub fn record_store_op(op: &str, result: &str) {
    if let Some(c) = STORE_OPS.get() {
        c.with_label_values(&[op, result]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        init();
        init();

        record_command("ping", 0.001);
        record_command_error("quote add", "store");
        record_access_denied("quote approve", "role");
        record_store_op("get", "not_found");

        let output = gather_metrics();
        assert!(output.contains("bot_command_total"));
        assert!(output.contains("bot_command_errors_total"));
        assert!(output.contains("bot_access_denied_total"));
        assert!(output.contains("bot_store_ops_total"));
    }
}
