//! Warnings for deprecated accessors.

/// Sink for deprecation warnings.
///
/// Injected into operation classes so hosts can route warnings somewhere
/// other than the log.
#[cfg_attr(test, mockall::automock)]
pub trait DeprecationLogger: Send + Sync {
    /// Emits one warning.
    fn warn(&self, message: &str);
}

/// Discards all warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDeprecationLogger;

impl DeprecationLogger for NoOpDeprecationLogger {
    fn warn(&self, _message: &str) {}
}

/// Emits warnings through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDeprecationLogger;

impl DeprecationLogger for TracingDeprecationLogger {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "contractflow::deprecation", "{}", message);
    }
}
