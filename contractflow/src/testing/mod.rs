//! Testing utilities for operations and contracts.
//!
//! This module provides:
//! - Stub contracts with fixed outcomes
//! - A recording deprecation logger
//! - Fixture operation classes
//! - Assertions over operation results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_field_error, assert_invalid, assert_valid};
pub use fixtures::{post_form, post_operation, recording_operation};
pub use mocks::{RecordingDeprecationLogger, StubContract};
