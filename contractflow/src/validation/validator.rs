//! Base validator and the strict wrapper.

use super::resolver::{contract, ContractArgs};
use crate::contracts::{Contract, ContractErrors};
use crate::errors::{ContractError, InvalidContractError};
use crate::operation::Operation;

/// Callback receiving the contract after a passing validation.
pub type OnSuccess<'a> = &'a mut dyn FnMut(&dyn Contract);

/// Validates a params payload against an operation's contract.
pub trait Validate {
    /// Runs validation, returning the validity flag.
    ///
    /// Implementations record `valid` (and `errors` on failure) on the
    /// operation result.
    fn validate<O>(
        &self,
        op: &mut O,
        params: &serde_json::Value,
        args: ContractArgs,
        on_success: Option<OnSuccess<'_>>,
    ) -> Result<bool, ContractError>
    where
        O: Operation + ?Sized;
}

/// Records a failed validation as data and never errors on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validate for Validator {
    fn validate<O>(
        &self,
        op: &mut O,
        params: &serde_json::Value,
        args: ContractArgs,
        on_success: Option<OnSuccess<'_>>,
    ) -> Result<bool, ContractError>
    where
        O: Operation + ?Sized,
    {
        let (valid, errors) = {
            let contract = contract(op, args)?;
            if contract.validate(params) {
                if let Some(callback) = on_success {
                    callback(&*contract);
                }
                (true, None)
            } else {
                (false, Some(contract.errors()))
            }
        };

        let result = op.result_mut();
        if let Some(errors) = &errors {
            result.set_errors(errors);
        }
        result.set_valid(valid);

        tracing::debug!(
            valid,
            error_count = errors.as_ref().map_or(0, ContractErrors::len),
            "Validated params against contract"
        );
        Ok(valid)
    }
}

/// Wraps a validator so failures become [`ContractError::Invalid`].
///
/// Meant for fail-fast callers such as tests; the result mapping is still
/// written by the inner validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict<V = Validator> {
    inner: V,
}

impl<V> Strict<V> {
    /// Wraps `inner`.
    pub const fn new(inner: V) -> Self {
        Self { inner }
    }

    /// The wrapped validator.
    pub const fn inner(&self) -> &V {
        &self.inner
    }
}

impl<V: Validate> Validate for Strict<V> {
    fn validate<O>(
        &self,
        op: &mut O,
        params: &serde_json::Value,
        args: ContractArgs,
        on_success: Option<OnSuccess<'_>>,
    ) -> Result<bool, ContractError>
    where
        O: Operation + ?Sized,
    {
        let slot = op.config().instance_path(args.name.as_deref());
        let class_path = op.config().class_path(args.name.as_deref());
        let valid = self.inner.validate(op, params, args, on_success)?;

        if !valid {
            let errors = op
                .skills()
                .contract(&slot)
                .map(|contract| contract.errors())
                .ok_or_else(|| ContractError::missing_contract_class(class_path))?;
            tracing::debug!(slot = %slot, %errors, "Strict validation failed");
            return Err(InvalidContractError::new(errors).into());
        }

        Ok(valid)
    }
}
