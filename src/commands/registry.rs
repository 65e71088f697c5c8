//! Command registry.
//!
//! Built once at startup and read-only afterwards. Whether a handler is
//! also a processor is decided by which builder method registered it.

use super::{Command, Processor};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command '{0}' is already registered")]
    Duplicate(&'static str),
}

/// A registered processor, tagged with its command name for logs and
/// metrics.
pub struct ProcessorEntry {
    pub name: &'static str,
    pub processor: Arc<dyn Processor>,
}

/// Collects handlers before freezing them into a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    commands: HashMap<&'static str, Arc<dyn Command>>,
    order: Vec<&'static str>,
    processors: Vec<ProcessorEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command-only handler.
    pub fn command<C>(mut self, command: C) -> Result<Self, RegistryError>
    where
        C: Command + 'static,
    {
        self.insert(Arc::new(command))?;
        Ok(self)
    }

    /// Register a handler that is both a command and a processor.
    pub fn processor<C>(mut self, command: C) -> Result<Self, RegistryError>
    where
        C: Command + Processor + 'static,
    {
        let handler = Arc::new(command);
        let name = handler.name();
        self.insert(handler.clone())?;
        self.processors.push(ProcessorEntry {
            name,
            processor: handler,
        });
        Ok(self)
    }

    fn insert(&mut self, command: Arc<dyn Command>) -> Result<(), RegistryError> {
        let name = command.name();
        if self.commands.contains_key(name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.commands.insert(name, command);
        self.order.push(name);
        Ok(())
    }

    pub fn build(self) -> Registry {
        Registry {
            commands: self.commands,
            order: self.order,
            processors: self.processors,
        }
    }
}

/// Immutable keyword table plus the ordered processor list.
pub struct Registry {
    commands: HashMap<&'static str, Arc<dyn Command>>,
    order: Vec<&'static str>,
    processors: Vec<ProcessorEntry>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Exact, case-sensitive keyword lookup.
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(name)
    }

    /// Processors in registration order.
    pub fn processors(&self) -> impl Iterator<Item = &ProcessorEntry> {
        self.processors.iter()
    }

    /// Registered keywords in registration order.
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }
}
