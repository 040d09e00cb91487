//! Concrete Graph commands.
//!
//! Each command module exposes a `command()` constructor that composes the
//! shared Graph base with the command's own options, validators, telemetry
//! and action.

pub mod onenote;
pub mod planner;

use graphctl_engine::InvocationContext;
use serde_json::Value;

/// Hand a collection to the logger, optionally skipping empty results.
pub(crate) fn log_items(ctx: &InvocationContext, items: Vec<Value>, log_empty: bool) {
    if items.is_empty() && !log_empty {
        return;
    }
    ctx.logger().log(Value::Array(items));
}
