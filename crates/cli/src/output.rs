//! Terminal rendering of command results.

use std::io::Write;

use graphctl_engine::Logger;
use graphctl_util::redact_sensitive;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    /// Unknown values were already rejected by the command's validators.
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some("text") => Self::Text,
            _ => Self::Json,
        }
    }
}

/// Writes results to stdout and diagnostics to stderr.
pub struct StdoutLogger {
    format: OutputFormat,
    /// Columns shown by text output.
    projection: Vec<String>,
}

impl StdoutLogger {
    pub fn new(format: OutputFormat, projection: Vec<String>) -> Self {
        Self { format, projection }
    }

    fn render(&self, value: &Value) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
            OutputFormat::Text => render_text(value, &self.projection),
        }
    }
}

impl Logger for StdoutLogger {
    fn log(&self, value: Value) {
        let rendered = self.render(&value);
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", rendered);
    }

    fn log_to_stderr(&self, message: &str) {
        eprintln!("{}", redact_sensitive(message));
    }
}

/// Tab-separated rows of the projected properties, preceded by a header row.
/// Without a projection every item is printed as compact JSON.
fn render_text(value: &Value, projection: &[String]) -> String {
    let Value::Array(items) = value else {
        return cell(value);
    };
    if projection.is_empty() {
        return items.iter().map(Value::to_string).collect::<Vec<_>>().join("\n");
    }

    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(projection.join("\t"));
    for item in items {
        let row: Vec<String> = projection
            .iter()
            .map(|property| item.get(property).map(cell).unwrap_or_default())
            .collect();
        lines.push(row.join("\t"));
    }
    lines.join("\n")
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_output_projects_columns() {
        let items = json!([
            {"id": "p1", "title": "Launch", "owner": "g1", "createdDateTime": null},
            {"id": "p2", "title": "Roadmap", "owner": "g1"}
        ]);
        let projection = vec!["id".to_string(), "title".to_string(), "createdDateTime".to_string()];

        assert_eq!(
            render_text(&items, &projection),
            "id\ttitle\tcreatedDateTime\np1\tLaunch\t\np2\tRoadmap\t"
        );
    }

    #[test]
    fn nested_values_render_as_json_cells() {
        let items = json!([{"id": "b1", "owner": {"id": "u1"}}]);
        let projection = vec!["owner".to_string()];
        assert_eq!(render_text(&items, &projection), "owner\n{\"id\":\"u1\"}");
    }

    #[test]
    fn format_defaults_to_json() {
        assert_eq!(OutputFormat::from_option(None), OutputFormat::Json);
        assert_eq!(OutputFormat::from_option(Some("text")), OutputFormat::Text);
    }
}
