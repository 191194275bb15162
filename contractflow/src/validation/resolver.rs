//! Contract resolution and the per-run cache.

use crate::contracts::{Contract, ContractClass, Options};
use crate::errors::ContractError;
use crate::operation::Operation;

/// Optional inputs to contract resolution.
///
/// Every field falls back to the operation: `model` to its model, `options`
/// to an empty mapping, `contract_class` to the class registered for `name`.
#[derive(Debug, Clone, Default)]
pub struct ContractArgs {
    /// Named contract; `None` is the default contract.
    pub name: Option<String>,
    /// Model to build the contract around.
    pub model: Option<serde_json::Value>,
    /// Options for the contract constructor.
    pub options: Option<Options>,
    /// Class overriding the registered one.
    pub contract_class: Option<ContractClass>,
}

impl ContractArgs {
    /// No overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets a named contract.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the model.
    #[must_use]
    pub fn with_model(mut self, model: serde_json::Value) -> Self {
        self.model = Some(model);
        self
    }

    /// Overrides the options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Overrides the contract class.
    #[must_use]
    pub fn with_contract_class(mut self, class: ContractClass) -> Self {
        self.contract_class = Some(class);
        self
    }

    /// True when any override besides the name is set.
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        self.model.is_some() || self.options.is_some() || self.contract_class.is_some()
    }
}

/// Resolves the contract class for `op` and builds a new instance.
///
/// Does not touch the cache; see [`contract`].
pub fn contract_for<O>(op: &O, args: ContractArgs) -> Result<Box<dyn Contract>, ContractError>
where
    O: Operation + ?Sized,
{
    let ContractArgs {
        name,
        model,
        options,
        contract_class,
    } = args;

    let model = model
        .or_else(|| op.model().cloned())
        .unwrap_or(serde_json::Value::Null);
    let options = options.unwrap_or_default();

    let class = match contract_class {
        Some(class) => class,
        None => {
            let path = op.config().class_path(name.as_deref());
            op.skills()
                .contract_class(&path)?
                .ok_or_else(|| ContractError::missing_contract_class(path))?
        }
    };

    tracing::debug!(contract = class.name(), "Resolved contract class");
    op.build_contract(model, options, &class)
}

/// Returns the run's contract, building and memoizing it on first use.
///
/// Arguments on later calls are ignored: the first instance is returned
/// until it is explicitly forgotten.
pub fn contract<O>(op: &mut O, args: ContractArgs) -> Result<&mut dyn Contract, ContractError>
where
    O: Operation + ?Sized,
{
    let slot = op.config().instance_path(args.name.as_deref());

    // A cached instance is taken out and stored back unchanged.
    let instance = match op.skills_mut().forget_contract(&slot) {
        Some(cached) => {
            if args.has_overrides() {
                tracing::debug!(
                    slot = %slot,
                    "Contract already memoized, ignoring resolver arguments"
                );
            }
            cached
        }
        None => {
            let built = contract_for(&*op, args)?;
            tracing::debug!(slot = %slot, "Memoized contract");
            built
        }
    };

    Ok(op.skills_mut().memoize_contract(slot, instance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::ContractErrors;
    use crate::operation::{ContractDeclaration, OperationClass, OperationRun};
    use crate::testing::StubContract;
    use serde_json::json;

    fn stub_operation() -> OperationClass {
        let class = OperationClass::new("Create");
        class
            .set(
                "contract.class",
                StubContract::class("Stub", true, ContractErrors::new()),
            )
            .unwrap();
        class
    }

    #[test]
    fn test_has_overrides_ignores_name() {
        assert!(!ContractArgs::new().named("params").has_overrides());
        assert!(ContractArgs::new().with_model(json!({})).has_overrides());
        assert!(ContractArgs::new().with_options(Options::new()).has_overrides());
    }

    #[test]
    fn test_contract_for_passes_model_and_options() {
        let run = OperationRun::new(&stub_operation()).with_model(json!({"id": 1}));
        let mut options = Options::new();
        options.insert("locale".to_string(), json!("en"));

        let built = contract_for(
            &run,
            ContractArgs::new()
                .with_model(json!({"id": 2}))
                .with_options(options.clone()),
        )
        .unwrap();
        let stub = built.as_any().downcast_ref::<StubContract>().unwrap();

        assert_eq!(stub.model(), &json!({"id": 2}));
        assert_eq!(stub.options(), &options);
    }

    #[test]
    fn test_contract_for_defaults_to_null_model() {
        let run = OperationRun::new(&stub_operation());
        let built = contract_for(&run, ContractArgs::new()).unwrap();
        let stub = built.as_any().downcast_ref::<StubContract>().unwrap();
        assert_eq!(stub.model(), &serde_json::Value::Null);
    }

    #[test]
    fn test_contract_for_does_not_memoize() {
        let run = OperationRun::new(&stub_operation());
        contract_for(&run, ContractArgs::new()).unwrap();
        assert!(run.skills().contract("contract").is_none());
    }

    #[test]
    fn test_missing_named_contract_reports_path() {
        let class = OperationClass::new("Create");
        class.contract(ContractDeclaration::new()).unwrap();
        let run = OperationRun::new(&class);

        let err = contract_for(&run, ContractArgs::new().named("params")).unwrap_err();
        assert!(matches!(
            err,
            ContractError::MissingContractClass { ref path } if path == "contract.params.class"
        ));
    }

    #[test]
    fn test_plain_value_is_not_a_contract_class() {
        let class = OperationClass::new("Create");
        class.set("contract.class", json!("Post::Contract")).unwrap();
        let run = OperationRun::new(&class);

        let err = contract_for(&run, ContractArgs::new()).unwrap_err();
        assert!(matches!(err, ContractError::NotAContractClass { .. }));
    }

    #[test]
    fn test_contract_returns_the_stored_instance() {
        let mut run = OperationRun::new(&stub_operation());

        let returned = std::ptr::from_mut(
            contract(&mut run, ContractArgs::new().with_model(json!(1))).unwrap(),
        )
        .cast::<()>();
        let stored = std::ptr::from_ref(run.skills().contract("contract").unwrap())
            .cast::<()>()
            .cast_mut();
        assert_eq!(returned, stored);

        let again = contract(&mut run, ContractArgs::new().with_model(json!(2))).unwrap();
        let stub = again.as_any().downcast_ref::<StubContract>().unwrap();
        assert_eq!(stub.model(), &json!(1));
    }
}
