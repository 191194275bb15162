//! Contract trait and contract class descriptors.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use super::errors::ContractErrors;
use super::form::{Form, FormDefinition};
use crate::errors::ContractError;

/// Options mapping handed to a contract constructor.
pub type Options = HashMap<String, serde_json::Value>;

/// A form object that validates a params payload.
///
/// This is the whole surface the operation layer relies on; any form library
/// can be plugged in by implementing it and wrapping the constructor in a
/// [`ContractClass::custom`]. Contracts must be `Send` so a run can be
/// handed to another thread.
pub trait Contract: Send + std::fmt::Debug {
    /// Validates `params`, returning true when there are no errors.
    fn validate(&mut self, params: &serde_json::Value) -> bool;

    /// Errors from the last validation.
    fn errors(&self) -> ContractErrors;

    /// Allows callers to recover the concrete contract type.
    fn as_any(&self) -> &dyn Any;
}

/// Block that customizes the body of a contract class being built.
pub type ExtensionBlock = Arc<dyn Fn(&mut FormDefinition) + Send + Sync>;

/// Constructor shared by a contract class and its subclasses.
pub type ContractFactory =
    dyn Fn(&ContractClass, serde_json::Value, Options) -> anyhow::Result<Box<dyn Contract>>
        + Send
        + Sync;

struct ContractClassInner {
    name: String,
    parent: Option<ContractClass>,
    definition: FormDefinition,
    factory: Arc<ContractFactory>,
}

/// Descriptor of a buildable contract type.
///
/// Cloning shares the descriptor; equality is identity, so two classes built
/// from the same base and block are still distinct.
#[derive(Clone)]
pub struct ContractClass {
    inner: Arc<ContractClassInner>,
}

fn build_form(
    class: &ContractClass,
    model: serde_json::Value,
    options: Options,
) -> anyhow::Result<Box<dyn Contract>> {
    Ok(Box::new(Form::new(class.definition().clone(), model, options)))
}

static DEFAULT_FORM: LazyLock<ContractClass> = LazyLock::new(|| {
    let factory: Arc<ContractFactory> = Arc::new(build_form);
    ContractClass::from_parts("Form", None, FormDefinition::new(), factory)
});

impl ContractClass {
    fn from_parts(
        name: impl Into<String>,
        parent: Option<Self>,
        definition: FormDefinition,
        factory: Arc<ContractFactory>,
    ) -> Self {
        Self {
            inner: Arc::new(ContractClassInner {
                name: name.into(),
                parent,
                definition,
                factory,
            }),
        }
    }

    /// The framework default base class, building [`Form`] instances.
    #[must_use]
    pub fn form() -> Self {
        DEFAULT_FORM.clone()
    }

    /// A root class with its own constructor.
    #[must_use]
    pub fn custom<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Self, serde_json::Value, Options) -> anyhow::Result<Box<dyn Contract>>
            + Send
            + Sync
            + 'static,
    {
        Self::from_parts(name, None, FormDefinition::new(), Arc::new(factory))
    }

    /// Builds a subclass with a copy of this body, optionally extended.
    ///
    /// The parent's definition is never modified.
    #[must_use]
    pub fn subclass(&self, name: impl Into<String>, block: Option<&ExtensionBlock>) -> Self {
        let mut definition = self.inner.definition.clone();
        if let Some(block) = block {
            block(&mut definition);
        }
        Self::from_parts(
            name,
            Some(self.clone()),
            definition,
            Arc::clone(&self.inner.factory),
        )
    }

    /// Shorthand for [`ContractClass::subclass`] with an inline block.
    #[must_use]
    pub fn extend<F>(&self, name: impl Into<String>, block: F) -> Self
    where
        F: Fn(&mut FormDefinition) + Send + Sync + 'static,
    {
        let block: ExtensionBlock = Arc::new(block);
        self.subclass(name, Some(&block))
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Class body.
    #[must_use]
    pub fn definition(&self) -> &FormDefinition {
        &self.inner.definition
    }

    /// Direct superclass, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.inner.parent.as_ref()
    }

    /// Names from this class up to its root.
    #[must_use]
    pub fn ancestors(&self) -> Vec<String> {
        let mut names = vec![self.name().to_string()];
        let mut current = self.parent();
        while let Some(class) = current {
            names.push(class.name().to_string());
            current = class.parent();
        }
        names
    }

    /// True if `other` is this class or one of its superclasses.
    #[must_use]
    pub fn descends_from(&self, other: &Self) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.same_class(other) {
                return true;
            }
            current = class.parent();
        }
        false
    }

    /// Identity comparison.
    #[must_use]
    pub fn same_class(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Builds a contract instance for `model`.
    pub fn instantiate(
        &self,
        model: serde_json::Value,
        options: Options,
    ) -> Result<Box<dyn Contract>, ContractError> {
        (self.inner.factory)(self, model, options).map_err(|source| ContractError::Construction {
            class: self.name().to_string(),
            source,
        })
    }
}

impl PartialEq for ContractClass {
    fn eq(&self, other: &Self) -> bool {
        self.same_class(other)
    }
}

impl Eq for ContractClass {}

impl std::fmt::Debug for ContractClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractClass")
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(Self::name))
            .field("properties", &self.inner.definition.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubContract;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_default_form_is_shared() {
        assert_eq!(ContractClass::form(), ContractClass::form());
        assert_eq!(ContractClass::form().name(), "Form");
        assert!(ContractClass::form().definition().is_empty());
    }

    #[test]
    fn test_subclass_has_new_identity() {
        let base = ContractClass::form();
        let a = base.subclass("A", None);
        let b = base.subclass("A", None);

        assert_ne!(a, b);
        assert!(a.descends_from(&base));
        assert!(!base.descends_from(&a));
        assert_eq!(a.ancestors(), vec!["A".to_string(), "Form".to_string()]);
    }

    #[test]
    fn test_extension_does_not_touch_parent() {
        let parent = ContractClass::form().extend("Post", |def| {
            def.property("title").required();
        });
        let child = parent.extend("PostWithBody", |def| {
            def.property("body").required();
        });

        assert_eq!(parent.definition().len(), 1);
        assert_eq!(child.definition().len(), 2);
        assert!(child.descends_from(&parent));
    }

    #[test]
    fn test_instantiate_default_form() {
        let class = ContractClass::form().extend("Post", |def| {
            def.property("title").required();
        });

        let mut contract = class.instantiate(json!({}), Options::new()).unwrap();
        assert!(!contract.validate(&json!({})));
        assert!(contract.as_any().downcast_ref::<Form>().is_some());
    }

    #[test]
    fn test_custom_factory_inherited_by_subclass() {
        let class = StubContract::class("Stub", true, ContractErrors::new());
        let sub = class.subclass("SubStub", None);

        let contract = sub.instantiate(json!({"id": 1}), Options::new()).unwrap();
        let stub = contract.as_any().downcast_ref::<StubContract>().unwrap();
        assert_eq!(stub.model(), &json!({"id": 1}));
    }

    #[test]
    fn test_construction_failure_is_wrapped() {
        let class = ContractClass::custom("Broken", |_, _, _| anyhow::bail!("no database"));

        let err = class.instantiate(json!(null), Options::new()).unwrap_err();
        assert!(matches!(err, ContractError::Construction { ref class, .. } if class == "Broken"));
        assert!(err.to_string().contains("no database"));
    }
}
