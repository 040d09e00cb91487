//! Identifier resolution.
//!
//! Each resolver turns one human-friendly reference into the canonical
//! identifier with a single lookup. Nothing is cached, and the caller
//! awaits resolution before building any dependent URL.

mod group;
mod plan;
mod site;

pub use group::{GroupRef, group_id_by_display_name};
pub use plan::plan_id_by_title;
pub use site::site_id_by_url;

use serde_json::Value;

/// Collect the `id` of every item, skipping items without a string id.
fn ids(items: &[Value]) -> Vec<&str> {
    items.iter().filter_map(|item| item.get("id").and_then(Value::as_str)).collect()
}
