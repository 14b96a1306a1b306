//! Output formatting for CLI commands.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::{Table, Tabled};

const CLI_SCHEMA_VERSION: &str = "coreid.cli.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    /// Parse the `--format` flag; anything but `json` is a table.
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Render data in the specified format.
pub fn render_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table if data.is_empty() => "No items found.".dimmed().to_string(),
        OutputFormat::Table => Table::new(data).to_string(),
        OutputFormat::Json => format_json(data, "[]"),
    }
}

/// Print data in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    println!("{}", render_output(data, format));
}

/// Print a single item in the specified format.
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
        OutputFormat::Json => {
            println!("{}", format_json(data, "{}"));
        }
    }
}

// Status lines go to stderr so stdout stays parseable with --format json.
fn write_status<W: Write>(mut out: W, label: ColoredString, message: &str) {
    let _ = writeln!(out, "{} {}", label, message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    write_status(io::stderr().lock(), "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    write_status(io::stderr().lock(), "Info:".blue().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    write_status(io::stderr().lock(), "Warning:".yellow().bold(), message);
}

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    serde_json::to_string_pretty(&wrap_with_schema(value)).unwrap_or_else(|_| fallback.to_string())
}

fn wrap_with_schema(value: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": value
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_flag() {
        assert_eq!(OutputFormat::from_flag("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flag("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from_flag("yaml"), OutputFormat::Table);
    }

    #[test]
    fn test_json_is_wrapped_with_schema() {
        let out = format_json(&serde_json::json!({ "identifier": "04.3171.0008" }), "{}");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["schemaVersion"], CLI_SCHEMA_VERSION);
        assert_eq!(value["data"]["identifier"], "04.3171.0008");
    }

    #[derive(Serialize, Tabled)]
    struct Row {
        identifier: String,
    }

    #[test]
    fn test_json_output_is_only_json() {
        let rows = vec![Row {
            identifier: "04.3171.0001".to_string(),
        }];
        let out = render_output(&rows, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["data"][0]["identifier"], "04.3171.0001");
    }

    #[test]
    fn test_status_lines_use_the_given_writer() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        write_status(&mut buf, "Warning:".yellow().bold(), "in-memory store");
        assert_eq!(String::from_utf8(buf).unwrap(), "Warning: in-memory store\n");
    }
}
