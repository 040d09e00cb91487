//! # graphctl Engine
//!
//! Shared machinery every graphctl command is built from.
//!
//! ## Command Execution Framework
//!
//! - **`command`**: builder-based composition of option declarations,
//!   fail-fast async validators and telemetry contributions around a single
//!   async action
//! - **`error`**: the failure taxonomy of the resource layer and its
//!   translation into a single [`CommandError`](graphctl_types::CommandError)
//!
//! ## Resource Access Layer
//!
//! - **`odata`**: drains paginated collections by following `@odata.nextLink`
//! - **`resolve`**: turns display names, plan titles and site URLs into
//!   canonical identifiers
//! - **`context`**: per-invocation collaborators (transport, logger,
//!   telemetry sink, cancellation, page ceiling)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use graphctl_engine::{CommandBuilder, InvocationContext};
//!
//! let command = CommandBuilder::graph("planner plan list", "Returns a list of plans")
//!     .register_options([OptionDeclaration::optional("ownerGroupId")])
//!     .register_validator(validators::guid("ownerGroupId"))
//!     .build(PlanList)?;
//!
//! command.execute(&ctx, &args).await?;
//! ```

pub mod command;
pub mod context;
pub mod error;
pub mod logger;
pub mod odata;
pub mod resolve;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use command::{
    Command, CommandAction, CommandBuilder, OptionSchema, SchemaError, TelemetryRegistry, Validator, ValidatorPipeline,
    telemetry, validators,
};
pub use context::InvocationContext;
pub use error::{GraphError, translate};
pub use logger::{Logger, TelemetrySink, TracingTelemetrySink};
pub use odata::{Page, fetch_all_items, fetch_all_items_as};
pub use resolve::{GroupRef, group_id_by_display_name, plan_id_by_title, site_id_by_url};
