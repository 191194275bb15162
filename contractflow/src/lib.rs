//! # Contractflow
//!
//! Declarative validation contracts for business-logic operations.
//!
//! An operation class declares a contract (a form object) once at definition
//! time. Each run of the operation builds that contract around its model,
//! memoizes it and validates incoming params, recording the outcome on the
//! run's result instead of failing.
//!
//! - **Contract registry**: register default or named contracts built from a
//!   base class and an extension block
//! - **Heritage**: subclasses replay their parent's configuration log
//! - **Resolver and cache**: one contract instance per run, with injection
//!   and override points
//! - **Validators**: a data-only validator and a strict wrapper that errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use contractflow::prelude::*;
//!
//! let create = OperationClass::new("Post::Create");
//! create.contract(ContractDeclaration::new().extend(|form| {
//!     form.property("title").required().length(Some(3), None);
//! }))?;
//!
//! let mut run = OperationRun::new(&create).with_model(serde_json::json!({}));
//! let valid = run.validate(&serde_json::json!({"title": "Hello"}), ContractArgs::new())?;
//! assert_eq!(run.result().valid(), Some(valid));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod contracts;
pub mod errors;
pub mod observability;
pub mod operation;
pub mod testing;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ContractConfig;
    pub use crate::contracts::{
        Contract, ContractClass, ContractErrors, Form, FormDefinition, JsonKind, Options,
    };
    pub use crate::errors::{ContractError, InvalidContractError};
    pub use crate::observability::{
        init_tracing, DeprecationLogger, NoOpDeprecationLogger, TracingDeprecationLogger,
    };
    pub use crate::operation::{
        ContractDeclaration, Operation, OperationClass, OperationResult, OperationRun, Skill,
    };
    pub use crate::validation::{contract, contract_for, ContractArgs, Strict, Validate, Validator};
}
