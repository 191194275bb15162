//! Test assertions for operation results.

use crate::contracts::ContractErrors;
use crate::operation::OperationResult;

/// Asserts that the last validation passed and wrote no errors.
pub fn assert_valid(result: &OperationResult) {
    assert_eq!(
        result.valid(),
        Some(true),
        "Expected a valid result, got {:?}",
        result.to_dict()
    );
    assert!(
        result.errors().is_none(),
        "Expected no errors, got {:?}",
        result.errors()
    );
}

/// Asserts that the last validation failed and returns its errors.
pub fn assert_invalid(result: &OperationResult) -> ContractErrors {
    assert_eq!(
        result.valid(),
        Some(false),
        "Expected an invalid result, got {:?}",
        result.to_dict()
    );
    match result.errors() {
        Some(errors) => errors,
        None => panic!("Expected errors on an invalid result"),
    }
}

/// Asserts that `field` failed with `message`.
pub fn assert_field_error(result: &OperationResult, field: &str, message: &str) {
    let errors = assert_invalid(result);
    assert!(
        errors.get(field).iter().any(|m| m == message),
        "Expected '{}' on field '{}', got {:?}",
        message,
        field,
        errors.get(field)
    );
}
