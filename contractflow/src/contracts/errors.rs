//! Structured error collection reported by contracts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field-keyed validation messages produced by a contract.
///
/// Fields are kept in sorted order so the rendered form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractErrors {
    messages: BTreeMap<String, Vec<String>>,
}

impl ContractErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Builder form of [`ContractErrors::add`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    /// Messages recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map_or(&[], Vec::as_slice)
    }

    /// Fields that have at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Returns true when no messages were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// Removes all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Messages prefixed with their field name, e.g. `title must be filled`.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| format!("{field} {m}"))
            })
            .collect()
    }

    /// JSON object form, `{"field": ["message", ...]}`.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .messages
            .iter()
            .map(|(field, messages)| {
                (
                    field.clone(),
                    serde_json::Value::Array(
                        messages
                            .iter()
                            .map(|m| serde_json::Value::String(m.clone()))
                            .collect(),
                    ),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// Parses the JSON object form produced by [`ContractErrors::to_value`].
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

impl std::fmt::Display for ContractErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contract_errors_add_and_get() {
        let mut errors = ContractErrors::new();
        errors.add("title", "must be filled");
        errors.add("title", "is too short (minimum is 3)");
        errors.add("body", "must be a string");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("title").len(), 2);
        assert!(errors.get("missing").is_empty());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["body", "title"]);
    }

    #[test]
    fn test_contract_errors_display_is_sorted() {
        let errors = ContractErrors::new()
            .with("title", "must be filled")
            .with("body", "is too long (maximum is 5)");

        assert_eq!(
            errors.to_string(),
            "body is too long (maximum is 5), title must be filled"
        );
    }

    #[test]
    fn test_contract_errors_value_form() {
        let errors = ContractErrors::new().with("title", "must be filled");
        let value = errors.to_value();

        assert_eq!(value, serde_json::json!({"title": ["must be filled"]}));
        assert_eq!(ContractErrors::from_value(&value), Some(errors));
        assert_eq!(ContractErrors::from_value(&serde_json::json!(42)), None);
    }

    #[test]
    fn test_contract_errors_clear() {
        let mut errors = ContractErrors::new().with("a", "b");
        errors.clear();
        assert!(errors.is_empty());
        assert_eq!(errors.to_string(), "");
    }
}
