use graphctl_types::OptionDeclaration;
use indexmap::IndexMap;
use indexmap::map::Entry;
use thiserror::Error;

/// Problems detected while assembling a command definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("command '{command}' redeclares option '{option}' with a different required flag or value kind")]
    IncompatibleOption { command: String, option: String },

    #[error("command '{command}' uses short alias '-{short}' for both '{first}' and '{second}'")]
    DuplicateShort {
        command: String,
        short: char,
        first: String,
        second: String,
    },

    #[error("command '{command}' declares an option with an empty name")]
    EmptyName { command: String },
}

/// Merged option declarations of one command, in declaration order.
///
/// Redeclaring an option with the same required flag and value kind
/// replaces its help text and completion hints while keeping its position.
/// Any other redeclaration is recorded and surfaces from [`OptionSchema::finish`].
#[derive(Debug, Clone, Default)]
pub struct OptionSchema {
    options: IndexMap<String, OptionDeclaration>,
    conflicts: Vec<SchemaError>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn declare(&mut self, command: &str, declaration: OptionDeclaration) {
        if declaration.name.is_empty() {
            self.conflicts.push(SchemaError::EmptyName {
                command: command.to_string(),
            });
            return;
        }

        match self.options.entry(declaration.name.clone()) {
            Entry::Occupied(mut existing) => {
                if existing.get().is_compatible_with(&declaration) {
                    existing.insert(declaration);
                } else {
                    self.conflicts.push(SchemaError::IncompatibleOption {
                        command: command.to_string(),
                        option: declaration.name,
                    });
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(declaration);
            }
        }
    }

    /// Final consistency checks; returns the first recorded conflict.
    pub(crate) fn finish(self, command: &str) -> Result<Self, SchemaError> {
        if let Some(conflict) = self.conflicts.first() {
            return Err(conflict.clone());
        }

        {
            let mut shorts: IndexMap<char, &str> = IndexMap::new();
            for declaration in self.options.values() {
                let Some(short) = declaration.short_name else { continue };
                if let Some(first) = shorts.insert(short, declaration.name.as_str()) {
                    return Err(SchemaError::DuplicateShort {
                        command: command.to_string(),
                        short,
                        first: first.to_string(),
                        second: declaration.name.clone(),
                    });
                }
            }
        }

        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&OptionDeclaration> {
        self.options.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDeclaration> {
        self.options.values()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatible_redeclaration_keeps_position_and_takes_new_help() {
        let mut schema = OptionSchema::new();
        schema.declare("x", OptionDeclaration::optional("output"));
        schema.declare("x", OptionDeclaration::optional("groupId"));
        schema.declare("x", OptionDeclaration::optional("output").with_description("Output type"));

        let schema = schema.finish("x").expect("schema");
        let names: Vec<_> = schema.iter().map(|option| option.name.as_str()).collect();
        assert_eq!(names, vec!["output", "groupId"]);
        assert_eq!(
            schema.get("output").and_then(|option| option.description.as_deref()),
            Some("Output type")
        );
    }

    #[test]
    fn incompatible_redeclaration_is_reported_at_finish() {
        let mut schema = OptionSchema::new();
        schema.declare("planner plan list", OptionDeclaration::optional("debug"));
        schema.declare("planner plan list", OptionDeclaration::switch("debug"));

        assert_eq!(
            schema.finish("planner plan list").expect_err("conflict"),
            SchemaError::IncompatibleOption {
                command: "planner plan list".into(),
                option: "debug".into(),
            }
        );
    }

    #[test]
    fn duplicate_short_aliases_are_rejected() {
        let mut schema = OptionSchema::new();
        schema.declare("x", OptionDeclaration::optional("webUrl").with_short('u'));
        schema.declare("x", OptionDeclaration::optional("userName").with_short('u'));

        assert!(matches!(
            schema.finish("x"),
            Err(SchemaError::DuplicateShort { short: 'u', .. })
        ));
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut schema = OptionSchema::new();
        schema.declare("x", OptionDeclaration::optional(""));
        assert!(matches!(schema.finish("x"), Err(SchemaError::EmptyName { .. })));
    }
}
