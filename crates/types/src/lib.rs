//! Shared type definitions for graphctl commands.
//!
//! Everything a command author touches when describing a command lives here:
//! option declarations, the parsed argument bag, validation outcomes, the
//! telemetry property bag, and the terminal [`CommandError`].

mod args;
mod error;
mod telemetry;

pub use args::{ArgValue, ArgumentBag};
pub use error::{CommandError, ErrorKind};
pub use telemetry::TelemetryProperties;

use serde::{Deserialize, Serialize};

/// Value shape accepted by a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// The option takes a string value (`--groupId <groupId>`).
    String,
    /// The option is a switch (`--debug`).
    Boolean,
}

/// Declares a single command-line option for a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDeclaration {
    /// Long option name as typed on the command line, without dashes (e.g., "groupId").
    pub name: String,
    /// Optional single-character alias (e.g., 'u' for `--webUrl`).
    #[serde(default)]
    pub short_name: Option<char>,
    /// Whether the argument parser must reject invocations that omit the option.
    #[serde(default)]
    pub required: bool,
    /// Value shape of the option.
    pub kind: OptionKind,
    /// Static values offered for shell completion (empty when free-form).
    #[serde(default)]
    pub autocomplete: Vec<String>,
    /// Human-readable help text.
    #[serde(default)]
    pub description: Option<String>,
}

impl OptionDeclaration {
    /// Optional string-valued option.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            required: false,
            kind: OptionKind::String,
            autocomplete: Vec::new(),
            description: None,
        }
    }

    /// Required string-valued option.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::optional(name)
        }
    }

    /// Boolean switch.
    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            kind: OptionKind::Boolean,
            ..Self::optional(name)
        }
    }

    pub fn with_short(mut self, short_name: char) -> Self {
        self.short_name = Some(short_name);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_autocomplete<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.autocomplete = values.into_iter().map(Into::into).collect();
        self
    }

    /// Two declarations of the same name are compatible when they agree on
    /// the required flag and the value kind. Help text and completion hints
    /// may differ; the later declaration wins for those.
    pub fn is_compatible_with(&self, other: &OptionDeclaration) -> bool {
        self.name == other.name && self.required == other.required && self.kind == other.kind
    }
}

/// Result of running a validator against an [`ArgumentBag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(String),
}

impl ValidationOutcome {
    pub fn reject(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason.as_str()),
        }
    }
}
