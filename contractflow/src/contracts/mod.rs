//! Contract classes and the default form.
//!
//! This module provides:
//! - The [`Contract`] trait implemented by form objects
//! - [`ContractClass`] descriptors with subclassing and extension blocks
//! - The default rule-based [`Form`]
//! - The structured [`ContractErrors`] collection

mod class;
mod errors;
mod form;

pub use class::{Contract, ContractClass, ContractFactory, ExtensionBlock, Options};
pub use errors::ContractErrors;
pub use form::{Form, FormDefinition, JsonKind, Property, Rule, RuleFn};
