//! Output and analytics collaborators consumed by commands.

use graphctl_types::TelemetryProperties;
use serde_json::Value;
use tracing::debug;

/// Receives a command's results.
///
/// Rendering (JSON, text columns, ...) is the implementor's concern; commands
/// hand over the raw aggregated value exactly once on success.
pub trait Logger: Send + Sync {
    fn log(&self, value: Value);

    /// Diagnostic text that must not mix with command output.
    fn log_to_stderr(&self, message: &str);
}

/// Receives the telemetry properties collected for an invocation.
pub trait TelemetrySink: Send + Sync {
    fn track(&self, command_name: &str, properties: &TelemetryProperties);
}

/// Emits telemetry as `debug` records under the `graphctl::telemetry` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn track(&self, command_name: &str, properties: &TelemetryProperties) {
        let rendered = serde_json::to_string(properties).unwrap_or_default();
        debug!(
            target: "graphctl::telemetry",
            command = %command_name,
            property_count = properties.len(),
            properties = %rendered,
            "command invoked"
        );
    }
}
