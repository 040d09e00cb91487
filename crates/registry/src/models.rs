use graphctl_engine::{Command, SchemaError};
use indexmap::IndexMap;
use tracing::debug;

use crate::commands::{onenote, planner};

/// Every graphctl command, keyed by its full name.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Command>,
}

impl CommandRegistry {
    /// Build every command definition.
    ///
    /// # Errors
    /// The first option schema conflict of any command. A conflict means the
    /// binary was built with a broken definition, so callers abort startup.
    pub fn load() -> Result<Self, SchemaError> {
        let mut registry = Self::default();
        registry.insert(onenote::notebook_list::command()?);
        registry.insert(planner::bucket_list::command()?);
        registry.insert(planner::plan_list::command()?);
        debug!(command_count = registry.len(), "command registry loaded");
        Ok(registry)
    }

    pub fn insert(&mut self, command: Command) {
        self.commands.insert(command.name().to_string(), command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Find the command addressed by a sequence of subcommand words, such
    /// as `["planner", "plan", "list"]`.
    pub fn find_by_words<S: AsRef<str>>(&self, words: &[S]) -> Option<&Command> {
        let name = words.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
        self.get(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
