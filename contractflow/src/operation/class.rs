//! Class-level operation descriptor and contract DSL.

use parking_lot::RwLock;
use std::sync::Arc;

use super::heritage::{ContractDeclaration, Heritage, HeritageCommand};
use super::skills::{check_path, expect_contract_class, ClassSkills, Skill};
use crate::config::ContractConfig;
use crate::contracts::ContractClass;
use crate::errors::ContractError;
use crate::observability::{DeprecationLogger, TracingDeprecationLogger};

#[derive(Debug, Default)]
struct ClassState {
    heritage: Heritage,
    skills: ClassSkills,
}

struct OperationClassInner {
    name: String,
    parent: Option<OperationClass>,
    config: ContractConfig,
    logger: Arc<dyn DeprecationLogger>,
    state: RwLock<ClassState>,
}

/// Shared descriptor of an operation type.
///
/// Configured once at definition time, then read by every run. Cloning
/// shares the descriptor.
#[derive(Clone)]
pub struct OperationClass {
    inner: Arc<OperationClassInner>,
}

/// Builder for [`OperationClass`].
pub struct OperationClassBuilder {
    name: String,
    config: ContractConfig,
    logger: Arc<dyn DeprecationLogger>,
}

impl OperationClassBuilder {
    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: ContractConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the deprecation logger.
    #[must_use]
    pub fn logger(mut self, logger: Arc<dyn DeprecationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Validates the configuration and builds the class.
    pub fn build(self) -> Result<OperationClass, ContractError> {
        self.config.validate()?;
        Ok(OperationClass::from_parts(
            self.name,
            None,
            self.config,
            self.logger,
        ))
    }
}

impl OperationClass {
    fn from_parts(
        name: impl Into<String>,
        parent: Option<Self>,
        config: ContractConfig,
        logger: Arc<dyn DeprecationLogger>,
    ) -> Self {
        Self {
            inner: Arc::new(OperationClassInner {
                name: name.into(),
                parent,
                config,
                logger,
                state: RwLock::new(ClassState::default()),
            }),
        }
    }

    /// Creates a class with the default configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(
            name,
            None,
            ContractConfig::default(),
            Arc::new(TracingDeprecationLogger),
        )
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> OperationClassBuilder {
        OperationClassBuilder {
            name: name.into(),
            config: ContractConfig::default(),
            logger: Arc::new(TracingDeprecationLogger),
        }
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Class this one was inherited from.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.inner.parent.as_ref()
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &ContractConfig {
        &self.inner.config
    }

    /// Identity comparison.
    #[must_use]
    pub fn same_class(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Registers a contract.
    ///
    /// Builds a subclass of the declared base (the default form when none is
    /// given), applies the block and stores it at `<prefix>.class` or
    /// `<prefix>.<name>.class`. A later registration under the same name
    /// replaces the stored class; the heritage log keeps both calls.
    pub fn contract(
        &self,
        declaration: ContractDeclaration,
    ) -> Result<ContractClass, ContractError> {
        let path = self.config().class_path(declaration.name.as_deref());
        check_path(&path)?;

        let class_name = match &declaration.name {
            Some(name) => format!("{}::Contract[{name}]", self.name()),
            None => format!("{}::Contract", self.name()),
        };
        let base = declaration.base.clone().unwrap_or_else(ContractClass::form);
        let class = base.subclass(class_name, declaration.block.as_ref());

        let mut state = self.inner.state.write();
        state.heritage.record(HeritageCommand::Contract(declaration));
        state.skills.set(path.clone(), Skill::ContractClass(class.clone()))?;
        drop(state);

        tracing::debug!(
            operation = self.name(),
            path = %path,
            contract = class.name(),
            base = base.name(),
            "Registered contract class"
        );
        Ok(class)
    }

    /// Reads a class-level skill.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Skill> {
        self.inner.state.read().skills.get(path).cloned()
    }

    /// Writes a class-level skill and records the call.
    pub fn set(
        &self,
        path: impl Into<String>,
        skill: impl Into<Skill>,
    ) -> Result<(), ContractError> {
        let path = path.into();
        let skill = skill.into();
        check_path(&path)?;

        let mut state = self.inner.state.write();
        state.heritage.record(HeritageCommand::Set {
            path: path.clone(),
            skill: skill.clone(),
        });
        state.skills.set(path, skill)?;
        Ok(())
    }

    /// The contract class registered for `name` (`None` for the default).
    pub fn contract_class_for(
        &self,
        name: Option<&str>,
    ) -> Result<Option<ContractClass>, ContractError> {
        let path = self.config().class_path(name);
        expect_contract_class(self.get(&path), &path)
    }

    /// Reads the default contract class.
    #[deprecated(note = "use `OperationClass::get(\"contract.class\")`")]
    pub fn contract_class(&self) -> Result<Option<ContractClass>, ContractError> {
        let path = self.config().class_path(None);
        self.warn_deprecated(&format!(
            "OperationClass::contract_class is deprecated, \
             please use OperationClass::get(\"{path}\")"
        ));
        expect_contract_class(self.get(&path), &path)
    }

    /// Writes the default contract class.
    #[deprecated(note = "use `OperationClass::set(\"contract.class\", ..)`")]
    pub fn set_contract_class(&self, class: ContractClass) -> Result<(), ContractError> {
        let path = self.config().class_path(None);
        self.warn_deprecated(&format!(
            "OperationClass::set_contract_class is deprecated, \
             please use OperationClass::set(\"{path}\", ..)"
        ));
        self.set(path, class)
    }

    fn warn_deprecated(&self, message: &str) {
        if self.config().warn_deprecated {
            self.inner.logger.warn(message);
        }
    }

    /// A copy of the configuration log.
    #[must_use]
    pub fn heritage(&self) -> Heritage {
        self.inner.state.read().heritage.clone()
    }

    /// Paths stored at class level.
    #[must_use]
    pub fn skill_paths(&self) -> Vec<String> {
        self.inner
            .state
            .read()
            .skills
            .paths()
            .map(str::to_string)
            .collect()
    }

    /// Creates a subclass that replays this class's configuration log.
    ///
    /// The subclass owns its log and skills; registrations made on either
    /// class afterwards are not visible to the other.
    pub fn inherit(&self, name: impl Into<String>) -> Result<Self, ContractError> {
        let child = Self::from_parts(
            name,
            Some(self.clone()),
            self.inner.config.clone(),
            Arc::clone(&self.inner.logger),
        );
        let heritage = self.heritage();
        child.replay(&heritage)?;

        tracing::debug!(
            operation = child.name(),
            parent = self.name(),
            commands = heritage.len(),
            "Inherited operation class"
        );
        Ok(child)
    }

    fn replay(&self, heritage: &Heritage) -> Result<(), ContractError> {
        for command in heritage.commands() {
            match command {
                HeritageCommand::Contract(declaration) => {
                    self.contract(declaration.clone())?;
                }
                HeritageCommand::Set { path, skill } => {
                    self.set(path.clone(), skill.clone())?;
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for OperationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationClass")
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(Self::name))
            .field("config", &self.inner.config)
            .field("skills", &self.skill_paths())
            .finish()
    }
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use crate::observability::MockDeprecationLogger;
    use crate::testing::RecordingDeprecationLogger;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_contract_registers_default_path() {
        let op = OperationClass::new("Create");
        let class = op
            .contract(ContractDeclaration::new().extend(|def| {
                def.property("title").required();
            }))
            .unwrap();

        assert_eq!(class.name(), "Create::Contract");
        assert!(class.descends_from(&ContractClass::form()));
        assert_eq!(op.contract_class_for(None).unwrap(), Some(class));
        assert_eq!(op.skill_paths(), vec!["contract.class".to_string()]);
    }

    #[test]
    fn test_named_contract_and_base() {
        let base = ContractClass::form().extend("CommentForm", |def| {
            def.property("body").required();
        });
        let op = OperationClass::new("Comment");
        let class = op
            .contract(ContractDeclaration::new().named("params").base(base.clone()))
            .unwrap();

        assert_eq!(class.name(), "Comment::Contract[params]");
        assert!(class.descends_from(&base));
        assert_ne!(class, base);
        assert_eq!(op.contract_class_for(Some("params")).unwrap(), Some(class));
        assert_eq!(op.contract_class_for(None).unwrap(), None);
    }

    #[test]
    fn test_reregistration_last_write_wins() {
        let op = OperationClass::new("Create");
        let first = op.contract(ContractDeclaration::new()).unwrap();
        let second = op.contract(ContractDeclaration::new()).unwrap();

        assert_ne!(first, second);
        assert_eq!(op.contract_class_for(None).unwrap(), Some(second));
        assert_eq!(op.heritage().len(), 2);
    }

    #[test]
    fn test_invalid_name_is_rejected_before_recording() {
        let op = OperationClass::new("Create");
        let err = op
            .contract(ContractDeclaration::new().named("Not Valid"))
            .unwrap_err();

        assert!(matches!(err, ContractError::InvalidPath { .. }));
        assert!(op.heritage().is_empty());
    }

    #[test]
    fn test_builder_rejects_bad_prefix() {
        let result = OperationClass::builder("Create")
            .config(ContractConfig::new().with_prefix("bad prefix"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_prefix_paths() {
        let op = OperationClass::builder("Create")
            .config(ContractConfig::new().with_prefix("form"))
            .build()
            .unwrap();
        op.contract(ContractDeclaration::new()).unwrap();

        assert_eq!(op.skill_paths(), vec!["form.class".to_string()]);
    }

    #[test]
    fn test_deprecated_setter_matches_canonical() {
        let logger = Arc::new(RecordingDeprecationLogger::new());
        let deprecated = OperationClass::builder("A")
            .logger(logger.clone())
            .build()
            .unwrap();
        let canonical = OperationClass::new("B");
        let form = ContractClass::form().extend("Post", |_| {});

        deprecated.set_contract_class(form.clone()).unwrap();
        canonical.set("contract.class", form.clone()).unwrap();

        assert_eq!(deprecated.get("contract.class"), canonical.get("contract.class"));
        assert_eq!(deprecated.contract_class().unwrap(), Some(form));
        assert_eq!(logger.count(), 2);
        assert!(logger.messages()[0].contains("set_contract_class is deprecated"));
        assert!(logger.messages()[1].contains("contract_class is deprecated"));
    }

    #[test]
    fn test_deprecated_getter_warns_exactly_once() {
        let mut mock = MockDeprecationLogger::new();
        mock.expect_warn()
            .withf(|m| m.contains("contract.class"))
            .times(1)
            .return_const(());

        let op = OperationClass::builder("Create")
            .logger(Arc::new(mock))
            .build()
            .unwrap();
        assert_eq!(op.contract_class().unwrap(), None);
    }

    #[test]
    fn test_deprecation_warnings_can_be_silenced() {
        let logger = Arc::new(RecordingDeprecationLogger::new());
        let op = OperationClass::builder("Create")
            .config(ContractConfig::new().without_deprecation_warnings())
            .logger(logger.clone())
            .build()
            .unwrap();

        op.set_contract_class(ContractClass::form()).unwrap();
        assert_eq!(logger.count(), 0);
    }

    #[test]
    fn test_inherit_replays_in_order() {
        let parent = OperationClass::new("Create");
        let parent_class = parent
            .contract(ContractDeclaration::new().extend(|def| {
                def.property("title").required();
            }))
            .unwrap();
        parent.set("model.class", json!("Post")).unwrap();

        let child = parent.inherit("Update").unwrap();
        let child_class = child.contract_class_for(None).unwrap().unwrap();

        assert_ne!(child_class, parent_class);
        assert_eq!(child_class.name(), "Update::Contract");
        assert_eq!(child_class.definition().len(), 1);
        assert_eq!(child.get("model.class"), Some(Skill::Value(json!("Post"))));
        assert_eq!(child.heritage().len(), parent.heritage().len());
        assert!(child.parent().unwrap().same_class(&parent));
    }

    #[test]
    fn test_inherit_is_a_copy() {
        let parent = OperationClass::new("Create");
        parent.contract(ContractDeclaration::new()).unwrap();
        let child = parent.inherit("Update").unwrap();

        parent
            .contract(ContractDeclaration::new().named("extra"))
            .unwrap();
        child.set("policy.name", json!("admin")).unwrap();

        assert_eq!(child.contract_class_for(Some("extra")).unwrap(), None);
        assert_eq!(parent.get("policy.name"), None);
        assert_eq!(parent.heritage().len(), 2);
        assert_eq!(child.heritage().len(), 2);
    }
}
