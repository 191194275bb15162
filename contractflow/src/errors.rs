//! Error types for contract resolution and validation.
//!
//! A failed validation is not an error: it is reported as data on the
//! operation result. The variants here cover configuration mistakes and the
//! opt-in strict mode.

use std::collections::HashMap;
use thiserror::Error;

use crate::contracts::ContractErrors;

/// The main error type for contract operations.
#[derive(Debug, Error)]
pub enum ContractError {
    /// No contract class could be resolved at validation time.
    #[error("No contract class registered at `{path}`")]
    MissingContractClass {
        /// The skill path that was looked up.
        path: String,
    },

    /// The skill at a contract class path holds a plain value.
    #[error("Skill at `{path}` is not a contract class")]
    NotAContractClass {
        /// The skill path.
        path: String,
    },

    /// A skill path is not a dot-separated list of identifiers.
    #[error("Invalid skill path: `{path}`")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },

    /// The contract constructor failed.
    #[error("Failed to construct contract `{class}`: {source}")]
    Construction {
        /// Name of the contract class.
        class: String,
        /// Underlying failure.
        #[source]
        source: anyhow::Error,
    },

    /// Strict validation rejected the params.
    #[error(transparent)]
    Invalid(#[from] InvalidContractError),
}

impl ContractError {
    /// Creates a missing contract class error.
    #[must_use]
    pub fn missing_contract_class(path: impl Into<String>) -> Self {
        Self::MissingContractClass { path: path.into() }
    }

    /// Creates an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// True for setup mistakes that no retry can fix.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::MissingContractClass { path } => {
                map.insert("type".to_string(), serde_json::json!("MissingContractClass"));
                map.insert("path".to_string(), serde_json::json!(path));
            }
            Self::NotAContractClass { path } => {
                map.insert("type".to_string(), serde_json::json!("NotAContractClass"));
                map.insert("path".to_string(), serde_json::json!(path));
            }
            Self::InvalidPath { path } => {
                map.insert("type".to_string(), serde_json::json!("InvalidPath"));
                map.insert("path".to_string(), serde_json::json!(path));
            }
            Self::Construction { class, .. } => {
                map.insert("type".to_string(), serde_json::json!("ContractConstruction"));
                map.insert("class".to_string(), serde_json::json!(class));
            }
            Self::Invalid(err) => {
                map.insert("type".to_string(), serde_json::json!("InvalidContract"));
                map.insert("errors".to_string(), err.errors.to_value());
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Raised by strict validation when the contract rejects the params.
///
/// The message is the rendering of the contract's errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{errors}")]
pub struct InvalidContractError {
    /// The contract's errors at the time of failure.
    pub errors: ContractErrors,
}

impl InvalidContractError {
    /// Creates a new invalid contract error.
    #[must_use]
    pub fn new(errors: ContractErrors) -> Self {
        Self { errors }
    }
}
