//! Host capability trait and the default operation run.

use uuid::Uuid;

use super::class::OperationClass;
use super::result::OperationResult;
use super::skills::{Skill, Skills};
use crate::config::ContractConfig;
use crate::contracts::{Contract, ContractClass, Options};
use crate::errors::ContractError;
use crate::validation::{self, ContractArgs, OnSuccess, Strict, Validate, Validator};

/// What the contract layer needs from a host operation.
///
/// Implementors own one model, one skills overlay and one result per run.
/// The resolver, cache and validators in [`crate::validation`] are written
/// against this trait only.
pub trait Operation {
    /// The skills overlay for this run.
    fn skills(&self) -> &Skills;

    /// Mutable skills overlay.
    fn skills_mut(&mut self) -> &mut Skills;

    /// The model contracts are built around by default.
    fn model(&self) -> Option<&serde_json::Value>;

    /// The result mapping.
    fn result(&self) -> &OperationResult;

    /// Mutable result mapping.
    fn result_mut(&mut self) -> &mut OperationResult;

    /// Configuration of the operation class.
    fn config(&self) -> &ContractConfig {
        self.skills().class().config()
    }

    /// Builds a contract instance; override to customize construction.
    fn build_contract(
        &self,
        model: serde_json::Value,
        options: Options,
        class: &ContractClass,
    ) -> Result<Box<dyn Contract>, ContractError> {
        class.instantiate(model, options)
    }
}

/// A single invocation of an operation class.
///
/// Not meant to be shared: build a new run per call.
#[derive(Debug)]
pub struct OperationRun {
    run_id: Uuid,
    model: Option<serde_json::Value>,
    skills: Skills,
    result: OperationResult,
}

impl OperationRun {
    /// Creates a run of `class`.
    #[must_use]
    pub fn new(class: &OperationClass) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            model: None,
            skills: Skills::new(class.clone()),
            result: OperationResult::new(),
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: serde_json::Value) -> Self {
        self.model = Some(model);
        self
    }

    /// Injects a skill for this run, e.g. a `contract.class` override.
    pub fn with_skill(
        mut self,
        path: impl Into<String>,
        skill: impl Into<Skill>,
    ) -> Result<Self, ContractError> {
        self.skills.set(path, skill)?;
        Ok(self)
    }

    /// Injects a ready-built default contract.
    #[must_use]
    pub fn with_contract(mut self, contract: Box<dyn Contract>) -> Self {
        let slot = self.config().instance_path(None);
        self.skills.memoize_contract(slot, contract);
        self
    }

    /// Unique id of this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The operation class.
    #[must_use]
    pub fn class(&self) -> &OperationClass {
        self.skills.class()
    }

    /// Returns the memoized contract, building it on first use.
    pub fn contract(&mut self, args: ContractArgs) -> Result<&mut dyn Contract, ContractError> {
        validation::contract(self, args)
    }

    /// Drops the memoized contract so the next call resolves a new one.
    pub fn forget_contract(&mut self, name: Option<&str>) -> Option<Box<dyn Contract>> {
        let slot = self.config().instance_path(name);
        self.skills.forget_contract(&slot)
    }

    /// Validates `params`, escalating failures when the class is strict.
    pub fn validate(
        &mut self,
        params: &serde_json::Value,
        args: ContractArgs,
    ) -> Result<bool, ContractError> {
        let strict = self.config().strict;
        self.dispatch(params, args, None, strict)
    }

    /// Like [`OperationRun::validate`], calling `on_success` with the
    /// contract when validation passes.
    pub fn validate_with<F>(
        &mut self,
        params: &serde_json::Value,
        args: ContractArgs,
        mut on_success: F,
    ) -> Result<bool, ContractError>
    where
        F: FnMut(&dyn Contract),
    {
        let strict = self.config().strict;
        self.dispatch(params, args, Some(&mut on_success), strict)
    }

    /// Validates and returns [`ContractError::Invalid`] on failure,
    /// regardless of configuration.
    pub fn validate_strict(
        &mut self,
        params: &serde_json::Value,
        args: ContractArgs,
    ) -> Result<bool, ContractError> {
        self.dispatch(params, args, None, true)
    }

    fn dispatch(
        &mut self,
        params: &serde_json::Value,
        args: ContractArgs,
        on_success: Option<OnSuccess<'_>>,
        strict: bool,
    ) -> Result<bool, ContractError> {
        let span = tracing::debug_span!(
            "contract.validate",
            run_id = %self.run_id,
            operation = self.class().name(),
            strict
        );
        let _guard = span.enter();

        if strict {
            Strict::new(Validator).validate(self, params, args, on_success)
        } else {
            Validator.validate(self, params, args, on_success)
        }
    }
}

impl Operation for OperationRun {
    fn skills(&self) -> &Skills {
        &self.skills
    }

    fn skills_mut(&mut self) -> &mut Skills {
        &mut self.skills
    }

    fn model(&self) -> Option<&serde_json::Value> {
        self.model.as_ref()
    }

    fn result(&self) -> &OperationResult {
        &self.result
    }

    fn result_mut(&mut self) -> &mut OperationResult {
        &mut self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{post_operation, StubContract};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Records the field names of every validation span.
    #[derive(Clone, Default)]
    struct SpanFields(Arc<Mutex<Vec<Vec<String>>>>);

    impl<S: tracing::Subscriber> Layer<S> for SpanFields {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: Context<'_, S>,
        ) {
            if attrs.metadata().name() == "contract.validate" {
                let names = attrs
                    .metadata()
                    .fields()
                    .iter()
                    .map(|field| field.name().to_string())
                    .collect();
                self.0.lock().push(names);
            }
        }
    }

    #[test]
    fn test_validation_spans_share_fields() {
        let fields = SpanFields::default();
        let subscriber = tracing_subscriber::registry().with(fields.clone());
        let class = post_operation("Create").unwrap();

        tracing::subscriber::with_default(subscriber, || {
            let mut run = OperationRun::new(&class);
            run.validate(&json!({"title": "Hello"}), ContractArgs::new())
                .unwrap();
            run.validate_strict(&json!({"title": "Hello"}), ContractArgs::new())
                .unwrap();
        });

        let spans = fields.0.lock().clone();
        let expected: Vec<String> = ["run_id", "operation", "strict"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(spans, vec![expected.clone(), expected]);
    }

    #[test]
    fn test_with_contract_fills_default_slot() {
        let mut run = OperationRun::new(&OperationClass::new("Create"))
            .with_contract(Box::new(StubContract::passing()));

        assert!(run.skills().contract("contract").is_some());
        assert!(run.validate(&json!({}), ContractArgs::new()).unwrap());
    }
}
