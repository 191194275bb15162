//! Inheritable log of class-level configuration calls.
//!
//! Every configuration call on an operation class is appended here. When a
//! subclass is created it replays a copy of the log in order, so it ends up
//! with its own freshly built configuration rather than shared state.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::skills::Skill;
use crate::contracts::{ContractClass, ExtensionBlock, FormDefinition};

/// Arguments of one contract registration.
#[derive(Clone, Default)]
pub struct ContractDeclaration {
    /// Contract name; `None` registers the default contract.
    pub name: Option<String>,
    /// Class to subclass; `None` uses the default form.
    pub base: Option<ContractClass>,
    /// Block applied to the new class body.
    pub block: Option<ExtensionBlock>,
}

impl ContractDeclaration {
    /// Declares the default contract with no base and no block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the contract name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the base class.
    #[must_use]
    pub fn base(mut self, base: ContractClass) -> Self {
        self.base = Some(base);
        self
    }

    /// Sets the extension block.
    #[must_use]
    pub fn extend<F>(mut self, block: F) -> Self
    where
        F: Fn(&mut FormDefinition) + Send + Sync + 'static,
    {
        self.block = Some(Arc::new(block));
        self
    }
}

impl std::fmt::Debug for ContractDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractDeclaration")
            .field("name", &self.name)
            .field("base", &self.base.as_ref().map(ContractClass::name))
            .field("block", &self.block.is_some())
            .finish()
    }
}

/// A recorded configuration call.
#[derive(Debug, Clone)]
pub enum HeritageCommand {
    /// `OperationClass::contract`.
    Contract(ContractDeclaration),
    /// `OperationClass::set`.
    Set {
        /// Skill path.
        path: String,
        /// Stored skill.
        skill: Skill,
    },
}

/// A command with the time it was recorded.
#[derive(Debug, Clone)]
pub struct HeritageEntry {
    /// The recorded call.
    pub command: HeritageCommand,
    /// When it was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Append-only command log.
#[derive(Debug, Clone, Default)]
pub struct Heritage {
    entries: Vec<HeritageEntry>,
}

impl Heritage {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command.
    pub fn record(&mut self, command: HeritageCommand) {
        self.entries.push(HeritageEntry {
            command,
            recorded_at: Utc::now(),
        });
    }

    /// Entries in recording order.
    #[must_use]
    pub fn entries(&self) -> &[HeritageEntry] {
        &self.entries
    }

    /// Commands in recording order.
    pub fn commands(&self) -> impl Iterator<Item = &HeritageCommand> {
        self.entries.iter().map(|e| &e.command)
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
