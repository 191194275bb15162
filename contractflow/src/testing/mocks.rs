//! Stub contracts and recording loggers.

use parking_lot::Mutex;
use std::any::Any;

use crate::contracts::{Contract, ContractClass, ContractErrors, Options};
use crate::observability::DeprecationLogger;

/// A contract with a fixed outcome that records what it was given.
#[derive(Debug, Clone)]
pub struct StubContract {
    valid: bool,
    errors: ContractErrors,
    model: serde_json::Value,
    options: Options,
    received: Vec<serde_json::Value>,
}

impl StubContract {
    /// Creates a stub with the given outcome.
    #[must_use]
    pub fn new(valid: bool, errors: ContractErrors) -> Self {
        Self {
            valid,
            errors,
            model: serde_json::Value::Null,
            options: Options::new(),
            received: Vec::new(),
        }
    }

    /// A stub that always passes.
    #[must_use]
    pub fn passing() -> Self {
        Self::new(true, ContractErrors::new())
    }

    /// A stub that always fails with `errors`.
    #[must_use]
    pub fn failing(errors: ContractErrors) -> Self {
        Self::new(false, errors)
    }

    /// A contract class building stubs with the given outcome.
    #[must_use]
    pub fn class(name: impl Into<String>, valid: bool, errors: ContractErrors) -> ContractClass {
        ContractClass::custom(name, move |_, model, options| {
            let mut stub = Self::new(valid, errors.clone());
            stub.model = model;
            stub.options = options;
            Ok(Box::new(stub) as Box<dyn Contract>)
        })
    }

    /// Whether validation passes.
    #[must_use]
    pub fn is_passing(&self) -> bool {
        self.valid
    }

    /// The model passed at construction.
    #[must_use]
    pub fn model(&self) -> &serde_json::Value {
        &self.model
    }

    /// The options passed at construction.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Params from every validate call, in order.
    #[must_use]
    pub fn received(&self) -> &[serde_json::Value] {
        &self.received
    }
}

impl Contract for StubContract {
    fn validate(&mut self, params: &serde_json::Value) -> bool {
        self.received.push(params.clone());
        self.valid
    }

    fn errors(&self) -> ContractErrors {
        if self.valid {
            ContractErrors::new()
        } else {
            self.errors.clone()
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A deprecation logger that keeps every message.
#[derive(Debug, Default)]
pub struct RecordingDeprecationLogger {
    messages: Mutex<Vec<String>>,
}

impl RecordingDeprecationLogger {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded messages in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }

    /// Clears recorded messages.
    pub fn reset(&self) {
        self.messages.lock().clear();
    }
}

impl DeprecationLogger for RecordingDeprecationLogger {
    fn warn(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stub_records_params() {
        let mut stub = StubContract::passing();
        assert!(stub.validate(&json!({"a": 1})));
        assert!(stub.validate(&json!({"a": 2})));
        assert_eq!(stub.received().len(), 2);
    }

    #[test]
    fn test_failing_stub_reports_errors() {
        let errors = ContractErrors::new().with("a", "is wrong");
        let mut stub = StubContract::failing(errors.clone());
        assert!(!stub.validate(&json!({})));
        assert_eq!(stub.errors(), errors);
    }

    #[test]
    fn test_recording_logger() {
        let logger = RecordingDeprecationLogger::new();
        logger.warn("one");
        logger.warn("two");
        assert_eq!(logger.messages(), vec!["one".to_string(), "two".to_string()]);

        logger.reset();
        assert_eq!(logger.count(), 0);
    }
}
