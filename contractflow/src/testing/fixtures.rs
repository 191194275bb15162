//! Fixture operation classes.

use std::sync::Arc;

use super::mocks::RecordingDeprecationLogger;
use crate::config::ContractConfig;
use crate::contracts::{FormDefinition, JsonKind};
use crate::errors::ContractError;
use crate::operation::{ContractDeclaration, OperationClass};

/// Form body for a blog post: required `title` (3..=50 chars), optional
/// `body` up to 200 chars.
pub fn post_form(definition: &mut FormDefinition) {
    definition
        .property("title")
        .required()
        .kind(JsonKind::String)
        .length(Some(3), Some(50));
    definition
        .property("body")
        .kind(JsonKind::String)
        .length(None, Some(200));
}

/// An operation class whose default contract is [`post_form`].
pub fn post_operation(name: impl Into<String>) -> Result<OperationClass, ContractError> {
    let class = OperationClass::new(name);
    class.contract(ContractDeclaration::new().extend(post_form))?;
    Ok(class)
}

/// An operation class that records deprecation warnings.
pub fn recording_operation(
    name: impl Into<String>,
    config: ContractConfig,
) -> Result<(OperationClass, Arc<RecordingDeprecationLogger>), ContractError> {
    let logger = Arc::new(RecordingDeprecationLogger::new());
    let class = OperationClass::builder(name)
        .config(config)
        .logger(logger.clone())
        .build()?;
    Ok((class, logger))
}
