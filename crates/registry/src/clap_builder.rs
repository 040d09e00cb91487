use std::collections::BTreeMap;

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use graphctl_engine::Command;
use graphctl_types::{ArgumentBag, OptionDeclaration, OptionKind};

use crate::CommandRegistry;

/// Builds the complete clap command tree from the registry.
///
/// Every word of a command name becomes one subcommand level, so
/// `planner plan list` is reached through `planner` → `plan` → `list`. The
/// leaf carries the command's merged option schema as `--long` arguments.
///
/// ```rust
/// use graphctl_registry::{CommandRegistry, build_clap};
///
/// let registry = CommandRegistry::load().expect("command definitions");
/// let clap = build_clap(&registry);
/// assert!(clap.find_subcommand("planner").is_some());
/// ```
pub fn build_clap(registry: &CommandRegistry) -> ClapCommand {
    let mut tree = CommandNode::default();
    for command in registry.iter() {
        tree.insert(command.name().split_whitespace(), command);
    }

    let root = ClapCommand::new("graphctl")
        .about("Command-line access to Microsoft Graph")
        .subcommand_required(true)
        .arg_required_else_help(true);
    tree.attach_children(root)
}

/// Locate the command selected by `matches` and convert its arguments.
///
/// Returns `None` when the matches do not reach a registered leaf command.
pub fn resolve_invocation<'a>(registry: &'a CommandRegistry, matches: &ArgMatches) -> Option<(&'a Command, ArgumentBag)> {
    let mut words = Vec::new();
    let mut current = matches;
    while let Some((word, sub_matches)) = current.subcommand() {
        words.push(word);
        current = sub_matches;
    }

    let command = registry.find_by_words(&words)?;
    Some((command, arguments_from_matches(command, current)))
}

/// Convert leaf matches into an [`ArgumentBag`] holding only the options
/// the user supplied.
pub fn arguments_from_matches(command: &Command, matches: &ArgMatches) -> ArgumentBag {
    let mut args = ArgumentBag::new();
    for option in command.options().iter() {
        let name = option.name.as_str();
        match option.kind {
            OptionKind::Boolean => {
                if matches.try_get_one::<bool>(name).ok().flatten().copied().unwrap_or(false) {
                    args.insert(name, true);
                }
            }
            OptionKind::String => {
                if let Some(value) = matches.try_get_one::<String>(name).ok().flatten() {
                    args.insert(name, value.clone());
                }
            }
        }
    }
    args
}

#[derive(Default)]
struct CommandNode<'a> {
    children: BTreeMap<String, CommandNode<'a>>,
    command: Option<&'a Command>,
}

impl<'a> CommandNode<'a> {
    fn insert<'w>(&mut self, mut words: impl Iterator<Item = &'w str>, command: &'a Command) {
        match words.next() {
            Some(word) => self.children.entry(word.to_string()).or_default().insert(words, command),
            None => self.command = Some(command),
        }
    }

    fn attach_children(self, mut parent: ClapCommand) -> ClapCommand {
        for (word, node) in self.children {
            parent = parent.subcommand(node.into_clap(&word));
        }
        parent
    }

    fn into_clap(self, word: &str) -> ClapCommand {
        // Clap builders require 'static strings; the tree is built once per process.
        let name: &'static str = Box::leak(word.to_string().into_boxed_str());
        let mut clap = ClapCommand::new(name);

        if let Some(command) = self.command {
            let about: &'static str = Box::leak(command.description().to_string().into_boxed_str());
            clap = clap.about(about);
            for option in command.options().iter() {
                clap = clap.arg(build_option_argument(option));
            }
        } else {
            clap = clap.subcommand_required(true).arg_required_else_help(true);
        }

        self.attach_children(clap)
    }
}

fn build_option_argument(option: &OptionDeclaration) -> Arg {
    let name: &'static str = Box::leak(option.name.clone().into_boxed_str());
    let mut arg = Arg::new(name).long(name).required(option.required);

    if let Some(short) = option.short_name {
        arg = arg.short(short);
    }

    arg = match option.kind {
        OptionKind::Boolean => arg.action(ArgAction::SetTrue),
        OptionKind::String => arg.action(ArgAction::Set).value_name(name),
    };

    arg.help(generate_help_text(option))
}

fn generate_help_text(option: &OptionDeclaration) -> String {
    let base = match &option.description {
        Some(description) => description.clone(),
        None => match option.kind {
            OptionKind::Boolean => "type: boolean".to_string(),
            OptionKind::String => "type: string".to_string(),
        },
    };
    if option.autocomplete.is_empty() {
        base
    } else {
        format!("{} (values: {})", base, option.autocomplete.join(", "))
    }
}
