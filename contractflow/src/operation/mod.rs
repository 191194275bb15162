//! Operation classes, runs and their configuration stores.
//!
//! This module provides:
//! - [`OperationClass`]: the class-level descriptor with the contract DSL
//! - [`Heritage`]: the inheritable configuration log
//! - [`Skills`]: namespaced configuration with per-run overrides
//! - [`Operation`] and [`OperationRun`]: the host interface and default host
//! - [`OperationResult`]: the per-run result mapping

mod class;
mod heritage;
mod host;
mod result;
mod skills;

pub use class::{OperationClass, OperationClassBuilder};
pub use heritage::{ContractDeclaration, Heritage, HeritageCommand, HeritageEntry};
pub use host::{Operation, OperationRun};
pub use result::{OperationResult, ERRORS_KEY, VALID_KEY};
pub use skills::{is_valid_path, ClassSkills, Skill, Skills};
