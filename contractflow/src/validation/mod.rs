//! Contract resolution, memoization and validation.
//!
//! This module provides:
//! - [`contract_for`]: resolve and build a contract for an operation
//! - [`contract`]: the per-run memoized accessor
//! - [`Validator`] and the [`Strict`] wrapper

mod resolver;
mod validator;

pub use resolver::{contract, contract_for, ContractArgs};
pub use validator::{OnSuccess, Strict, Validate, Validator};
