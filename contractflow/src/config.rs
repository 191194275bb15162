//! Configuration for operation classes.

use serde::{Deserialize, Serialize};

use crate::errors::ContractError;
use crate::operation::is_valid_path;

/// Settings shared by an operation class and its subclasses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Path prefix for contract skills (`<prefix>.class`, `<prefix>`).
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Whether `OperationRun::validate` escalates failures into errors.
    #[serde(default)]
    pub strict: bool,
    /// Whether deprecated accessors emit a warning.
    #[serde(default = "default_warn_deprecated")]
    pub warn_deprecated: bool,
}

fn default_prefix() -> String {
    "contract".to_string()
}

fn default_warn_deprecated() -> bool {
    true
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            strict: false,
            warn_deprecated: default_warn_deprecated(),
        }
    }
}

impl ContractConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the skill path prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enables strict validation.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Silences deprecation warnings.
    #[must_use]
    pub fn without_deprecation_warnings(mut self) -> Self {
        self.warn_deprecated = false;
        self
    }

    /// Checks that the prefix is a usable skill path.
    pub fn validate(&self) -> Result<(), ContractError> {
        if is_valid_path(&self.prefix) {
            Ok(())
        } else {
            Err(ContractError::invalid_path(&self.prefix))
        }
    }

    /// Path of the class skill for a contract name.
    #[must_use]
    pub fn class_path(&self, name: Option<&str>) -> String {
        match name {
            Some(name) => format!("{}.{name}.class", self.prefix),
            None => format!("{}.class", self.prefix),
        }
    }

    /// Path of the memoized instance for a contract name.
    #[must_use]
    pub fn instance_path(&self, name: Option<&str>) -> String {
        match name {
            Some(name) => format!("{}.{name}", self.prefix),
            None => self.prefix.clone(),
        }
    }
}
