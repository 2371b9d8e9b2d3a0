//! Prometheus metrics collection for MechaSqueak.
//!
//! Metrics are registered once by [`init`] and exposed on the optional
//! `/metrics` endpoint (see [`crate::http`]). Recording helpers are no-ops
//! until `init` has run, so library users and tests that never call it pay
//! nothing.
//!
//! - `squeak_command_total{command,outcome}` - Handler runs, `ok` or `error`
//! - `squeak_command_duration_seconds{command}` - Handler latency histogram
//! - `squeak_command_rejections_total{command,reason}` - Validation rejections
//! - `squeak_lines_ignored_total{reason}` - Lines that were not commands for us
//! - `squeak_handler_errors_total{command,error}` - Handler failures
//! - `squeak_denylist_hits_total` - Dispatching commands from denylisted users
//! - `squeak_history_entries` - Invocations held by the history tracker

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// Handler runs by canonical name and outcome.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Rejected invocations by command and reason code.
pub static COMMAND_REJECTIONS: OnceLock<IntCounterVec> = OnceLock::new();

/// Chat lines that did not produce an invocation.
pub static LINES_IGNORED: OnceLock<IntCounterVec> = OnceLock::new();

/// Handler errors by command and error kind.
pub static HANDLER_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

pub static DENYLIST_HITS: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Histograms and gauges
// ========================================================================

/// Handler latency by command.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Current history tracker size.
pub static HISTORY_ENTRIES: OnceLock<IntGauge> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Safe to call more than once; later calls keep the first set of metrics.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
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
            }
        };
    }

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("squeak_command_total", "Handler runs by name and outcome"), &["command", "outcome"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("squeak_command_duration_seconds", "Command handler latency by name")
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["command"]));
    register!(COMMAND_REJECTIONS, IntCounterVec::new(Opts::new("squeak_command_rejections_total", "Rejected invocations by reason"), &["command", "reason"]));
    register!(LINES_IGNORED, IntCounterVec::new(Opts::new("squeak_lines_ignored_total", "Chat lines that were not commands"), &["reason"]));
    register!(HANDLER_ERRORS, IntCounterVec::new(Opts::new("squeak_handler_errors_total", "Command handler errors by kind"), &["command", "error"]));
    register!(DENYLIST_HITS, IntCounter::new("squeak_denylist_hits_total", "Dispatching commands used by denylisted senders"));
    register!(HISTORY_ENTRIES, IntGauge::new("squeak_history_entries", "Invocations held in command history"));
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

// ============================================================================
// Recording helpers
// ============================================================================

/// Record one handler run with its latency.
#[inline]
pub fn record_command(command: &str, outcome: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command, outcome]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

#[inline]
pub fn record_rejection(command: &str, reason: &str) {
    if let Some(c) = COMMAND_REJECTIONS.get() {
        c.with_label_values(&[command, reason]).inc();
    }
}

/// Record a line that produced no invocation.
#[inline]
pub fn record_ignored(reason: &str) {
    if let Some(c) = LINES_IGNORED.get() {
        c.with_label_values(&[reason]).inc();
    }
}

#[inline]
pub fn record_handler_error(command: &str, error: &str) {
    if let Some(c) = HANDLER_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

#[inline]
pub fn record_denylist_hit() {
    if let Some(c) = DENYLIST_HITS.get() {
        c.inc();
    }
}

#[inline]
pub fn set_history_entries(count: usize) {
    if let Some(g) = HISTORY_ENTRIES.get() {
        g.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        init();
        init();

        record_command("sysc", "ok", 0.001);
        record_rejection("sysc", "too_few_parameters");
        record_ignored("unknown_command");
        set_history_entries(3);

        let output = gather_metrics();
        assert!(output.contains("squeak_command_total"));
        assert!(output.contains("squeak_command_rejections_total"));
        assert!(output.contains("squeak_lines_ignored_total"));
    }
}
