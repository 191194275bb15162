//! Per-run result mapping.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::contracts::ContractErrors;

/// Key holding the validity flag.
pub const VALID_KEY: &str = "valid";
/// Key holding the contract errors.
pub const ERRORS_KEY: &str = "errors";

/// Outcome data written by an operation run.
///
/// Entries are overwritten, never rolled back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    #[serde(flatten)]
    data: HashMap<String, serde_json::Value>,
}

impl OperationResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Sets a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// The validity flag from the last validation.
    #[must_use]
    pub fn valid(&self) -> Option<bool> {
        self.get(VALID_KEY).and_then(serde_json::Value::as_bool)
    }

    /// Records the validity flag.
    pub fn set_valid(&mut self, valid: bool) {
        self.set(VALID_KEY, serde_json::Value::Bool(valid));
    }

    /// Errors from the last failed validation.
    #[must_use]
    pub fn errors(&self) -> Option<ContractErrors> {
        self.get(ERRORS_KEY).and_then(ContractErrors::from_value)
    }

    /// Records contract errors.
    pub fn set_errors(&mut self, errors: &ContractErrors) {
        self.set(ERRORS_KEY, errors.to_value());
    }

    /// Returns a copy of all data.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        self.data.clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the result is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_valid_flag() {
        let mut result = OperationResult::new();
        assert_eq!(result.valid(), None);

        result.set_valid(false);
        assert_eq!(result.valid(), Some(false));
        result.set_valid(true);
        assert_eq!(result.valid(), Some(true));
    }

    #[test]
    fn test_errors_round_trip_through_json() {
        let errors = ContractErrors::new().with("title", "must be filled");
        let mut result = OperationResult::new();
        result.set_errors(&errors);

        assert_eq!(result.get(ERRORS_KEY), Some(&json!({"title": ["must be filled"]})));
        assert_eq!(result.errors(), Some(errors));
    }

    #[test]
    fn test_serializes_flat() {
        let mut result = OperationResult::new();
        result.set_valid(true);
        result.set("model", json!({"id": 1}));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"valid": true, "model": {"id": 1}}));
    }
}
