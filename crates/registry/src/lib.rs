//! Registry crate holding the concrete graphctl commands.
//!
//! This crate builds every command definition, exposes them by name through
//! [`CommandRegistry`], and turns them into a clap command tree.

pub mod clap_builder;
pub mod commands;
pub mod models;
pub mod names;

pub use clap_builder::{arguments_from_matches, build_clap, resolve_invocation};
pub use models::CommandRegistry;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_named_command_builds_and_is_registered() {
        let registry = CommandRegistry::load().expect("command definitions");
        let registered: HashSet<_> = registry.names().collect();
        let expected: HashSet<_> = names::ALL.iter().copied().collect();
        assert_eq!(registered, expected);
    }

    #[test]
    fn every_command_has_description_and_projection() {
        let registry = CommandRegistry::load().expect("command definitions");
        for command in registry.iter() {
            assert!(!command.description().is_empty(), "{} has no description", command.name());
            assert!(!command.default_properties().is_empty(), "{} has no projection", command.name());
            assert!(command.options().contains("output"), "{} lacks global options", command.name());
        }
    }
}
