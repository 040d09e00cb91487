//! Command composition.
//!
//! A [`Command`] is assembled with a [`CommandBuilder`] from three ordered
//! registries (option declarations, validators, telemetry contributions) and
//! a single [`CommandAction`]. [`CommandBuilder::graph`] supplies the options
//! and checks shared by every Graph command, and leaf commands layer theirs
//! on top.

mod options;
pub mod telemetry;
mod validator;
pub mod validators;

use std::sync::Arc;

use async_trait::async_trait;
use graphctl_types::{ArgumentBag, CommandError, OptionDeclaration, TelemetryProperties, ValidationOutcome};
use tracing::{debug, info};

pub use options::{OptionSchema, SchemaError};
pub use telemetry::{TelemetryContribution, TelemetryRegistry};
pub use validator::{FnValidator, Validator, ValidatorPipeline};

use crate::context::InvocationContext;
use crate::error::{GraphError, translate};

/// Supported values of the global `--output` option.
pub const OUTPUT_FORMATS: &[&str] = &["json", "text"];

const GLOBAL_SWITCHES: &[&str] = &["query", "debug", "verbose"];

/// The work a command performs once its arguments were accepted.
#[async_trait]
pub trait CommandAction: Send + Sync {
    async fn run(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<(), GraphError>;
}

pub struct CommandBuilder {
    name: String,
    description: String,
    default_properties: Vec<String>,
    schema: OptionSchema,
    validators: ValidatorPipeline,
    telemetry: TelemetryRegistry,
}

impl CommandBuilder {
    /// A bare builder with no options, validators or telemetry.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default_properties: Vec::new(),
            schema: OptionSchema::new(),
            validators: ValidatorPipeline::new(),
            telemetry: TelemetryRegistry::new(),
        }
    }

    /// Base definition of every Graph command: the global output, query and
    /// logging switches, the output format check, the effective output
    /// format and presence of the others in telemetry.
    pub fn graph(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description)
            .register_options([
                OptionDeclaration::optional("output")
                    .with_short('o')
                    .with_autocomplete(OUTPUT_FORMATS.iter().copied())
                    .with_description("Output type. Default json"),
                OptionDeclaration::optional("query").with_description("JMESPath query string"),
                OptionDeclaration::switch("debug").with_description("Runs command with debug logging"),
                OptionDeclaration::switch("verbose").with_description("Runs command with verbose logging"),
            ])
            .register_validator(validators::allowed_values("output", OUTPUT_FORMATS))
            .register_telemetry(telemetry::value_or("output", "json"))
            .register_telemetry(telemetry::presence(GLOBAL_SWITCHES))
    }

    pub fn register_options<I>(mut self, declarations: I) -> Self
    where
        I: IntoIterator<Item = OptionDeclaration>,
    {
        for declaration in declarations {
            self.schema.declare(&self.name, declaration);
        }
        self
    }

    /// Validators run in registration order, so structural checks should
    /// be registered before ones that call the network.
    pub fn register_validator<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Shorthand for a synchronous validator.
    pub fn register_check<F>(self, check: F) -> Self
    where
        F: Fn(&ArgumentBag) -> ValidationOutcome + Send + Sync + 'static,
    {
        self.register_validator(FnValidator::new(check))
    }

    pub fn register_telemetry(mut self, contribution: TelemetryContribution) -> Self {
        self.telemetry.push(contribution);
        self
    }

    /// Properties shown by text output when no explicit projection exists.
    pub fn default_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// # Errors
    /// The first option schema conflict recorded during registration.
    pub fn build<A>(self, action: A) -> Result<Command, SchemaError>
    where
        A: CommandAction + 'static,
    {
        let options = self.schema.finish(&self.name)?;
        Ok(Command {
            name: self.name,
            description: self.description,
            default_properties: self.default_properties,
            options,
            validators: self.validators,
            telemetry: self.telemetry,
            action: Arc::new(action),
        })
    }
}

/// A fully assembled command definition.
///
/// Definitions hold no per-invocation state and can be shared across
/// concurrent invocations.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    default_properties: Vec<String>,
    options: OptionSchema,
    validators: ValidatorPipeline,
    telemetry: TelemetryRegistry,
    action: Arc<dyn CommandAction>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("options", &self.options.len())
            .field("validators", &self.validators.len())
            .field("telemetry", &self.telemetry.len())
            .finish()
    }
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_properties(&self) -> &[String] {
        &self.default_properties
    }

    pub fn options(&self) -> &OptionSchema {
        &self.options
    }

    /// # Errors
    /// A cancelled invocation, or a failing network check, translated like
    /// any action failure.
    pub async fn validate(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<ValidationOutcome, CommandError> {
        self.validators.run(ctx, args).await.map_err(translate)
    }

    pub fn collect_telemetry(&self, args: &ArgumentBag) -> TelemetryProperties {
        self.telemetry.collect(args)
    }

    /// Run one invocation.
    ///
    /// Telemetry is reported first, whatever happens next. A rejected
    /// argument bag returns a validation error without running the action.
    /// Action failures are translated into a single [`CommandError`].
    pub async fn execute(&self, ctx: &InvocationContext, args: &ArgumentBag) -> Result<(), CommandError> {
        let properties = self.collect_telemetry(args);
        ctx.telemetry().track(&self.name, &properties);

        if let ValidationOutcome::Rejected(reason) = self.validate(ctx, args).await? {
            return Err(CommandError::validation(reason));
        }

        debug!(command = %self.name, "running command action");
        match self.action.run(ctx, args).await {
            Ok(()) => {
                info!(command = %self.name, "command completed");
                Ok(())
            }
            Err(error) => {
                let error = translate(error);
                debug!(command = %self.name, kind = ?error.kind(), "command failed");
                Err(error)
            }
        }
    }
}
