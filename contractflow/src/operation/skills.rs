//! Namespaced configuration store.
//!
//! Class-level skills are written at definition time. Each operation run
//! gets a [`Skills`] overlay that shadows class values and owns memoized
//! contract instances.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use super::class::OperationClass;
use crate::contracts::{Contract, ContractClass};
use crate::errors::ContractError;

#[allow(clippy::expect_used)]
static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*(\.[a-z_][a-z0-9_]*)*$").expect("skill path regex")
});

/// Returns true for dot-separated lowercase identifiers like `contract.class`.
#[must_use]
pub fn is_valid_path(path: &str) -> bool {
    PATH_PATTERN.is_match(path)
}

pub(crate) fn check_path(path: &str) -> Result<(), ContractError> {
    if is_valid_path(path) {
        Ok(())
    } else {
        Err(ContractError::invalid_path(path))
    }
}

/// A value stored under a skill path.
#[derive(Debug, Clone, PartialEq)]
pub enum Skill {
    /// A contract class.
    ContractClass(ContractClass),
    /// Any JSON value.
    Value(serde_json::Value),
}

impl Skill {
    /// Returns the contract class, if this is one.
    #[must_use]
    pub fn as_contract_class(&self) -> Option<&ContractClass> {
        match self {
            Self::ContractClass(class) => Some(class),
            Self::Value(_) => None,
        }
    }

    /// Returns the JSON value, if this is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::ContractClass(_) => None,
        }
    }
}

impl From<ContractClass> for Skill {
    fn from(class: ContractClass) -> Self {
        Self::ContractClass(class)
    }
}

impl From<serde_json::Value> for Skill {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

pub(crate) fn expect_contract_class(
    skill: Option<Skill>,
    path: &str,
) -> Result<Option<ContractClass>, ContractError> {
    match skill {
        None => Ok(None),
        Some(Skill::ContractClass(class)) => Ok(Some(class)),
        Some(Skill::Value(_)) => Err(ContractError::NotAContractClass {
            path: path.to_string(),
        }),
    }
}

/// Class-level skill entries, sorted by path.
#[derive(Debug, Clone, Default)]
pub struct ClassSkills {
    entries: BTreeMap<String, Skill>,
}

impl ClassSkills {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Skill> {
        self.entries.get(path)
    }

    /// Stores a skill, returning the previous one.
    pub fn set(
        &mut self,
        path: impl Into<String>,
        skill: Skill,
    ) -> Result<Option<Skill>, ContractError> {
        let path = path.into();
        check_path(&path)?;
        Ok(self.entries.insert(path, skill))
    }

    /// Stored paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-run skills: local overrides, class fallback and memoized contracts.
pub struct Skills {
    class: OperationClass,
    local: HashMap<String, Skill>,
    contracts: HashMap<String, Box<dyn Contract>>,
}

impl Skills {
    /// Creates an empty overlay over `class`.
    #[must_use]
    pub fn new(class: OperationClass) -> Self {
        Self {
            class,
            local: HashMap::new(),
            contracts: HashMap::new(),
        }
    }

    /// The operation class this overlay reads through to.
    #[must_use]
    pub fn class(&self) -> &OperationClass {
        &self.class
    }

    /// Looks up a path locally, then on the class.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Skill> {
        self.local
            .get(path)
            .cloned()
            .or_else(|| self.class.get(path))
    }

    /// Overrides a path for this run only.
    pub fn set(
        &mut self,
        path: impl Into<String>,
        skill: impl Into<Skill>,
    ) -> Result<(), ContractError> {
        let path = path.into();
        check_path(&path)?;
        self.local.insert(path, skill.into());
        Ok(())
    }

    /// Resolves a contract class stored at `path`.
    pub fn contract_class(&self, path: &str) -> Result<Option<ContractClass>, ContractError> {
        expect_contract_class(self.get(path), path)
    }

    /// The memoized contract at `path`.
    #[must_use]
    pub fn contract(&self, path: &str) -> Option<&dyn Contract> {
        self.contracts.get(path).map(|contract| &**contract)
    }

    /// Mutable access to the memoized contract at `path`.
    pub fn contract_mut(&mut self, path: &str) -> Option<&mut dyn Contract> {
        match self.contracts.get_mut(path) {
            Some(contract) => Some(contract.as_mut()),
            None => None,
        }
    }

    /// Stores a contract unless one is already memoized at `path`.
    ///
    /// Returns whichever instance is stored afterwards.
    pub fn memoize_contract(
        &mut self,
        path: impl Into<String>,
        contract: Box<dyn Contract>,
    ) -> &mut dyn Contract {
        self.contracts.entry(path.into()).or_insert(contract).as_mut()
    }

    /// Drops the memoized contract at `path`.
    pub fn forget_contract(&mut self, path: &str) -> Option<Box<dyn Contract>> {
        self.contracts.remove(path)
    }
}

impl std::fmt::Debug for Skills {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut contracts: Vec<_> = self.contracts.keys().collect();
        contracts.sort();
        f.debug_struct("Skills")
            .field("class", &self.class.name())
            .field("local", &self.local)
            .field("contracts", &contracts)
            .finish()
    }
}
