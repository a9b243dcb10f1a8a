//! Record rendering: project records through field definitions and print them
//! as a table, a plain listing, YAML or JSON.

pub mod field;
pub mod path;

pub use field::{display, FieldSpec, Modifier};
pub use path::{extract, FieldPath, PathError};

use crate::error::{ApiResult, ErrorInfo};
use clap::ValueEnum;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::{ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Output formats accepted by `-o/--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Plain,
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn is_tabular(self) -> bool {
        matches!(self, OutputFormat::Table | OutputFormat::Plain)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Table => "table",
            OutputFormat::Plain => "plain",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        };
        f.write_str(s)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "plain" => Ok(OutputFormat::Plain),
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Invalid output format: {} (must be 'table', 'plain', 'yaml' or 'json')",
                other
            )),
        }
    }
}

/// Everything needed for one render call.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub records: &'a [Value],
    pub fields: &'a [FieldSpec],
    pub format: OutputFormat,
    pub indent: usize,
}

impl<'a> RenderRequest<'a> {
    pub fn new(records: &'a [Value], fields: &'a [FieldSpec]) -> Self {
        Self {
            records,
            fields,
            format: OutputFormat::Table,
            indent: 0,
        }
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn render(&self) -> ApiResult<String> {
        let body = if self.fields.is_empty() {
            // No projection: dump the records, tabular formats fall back to YAML.
            match self.format {
                OutputFormat::Json => dump_json(self.records)?,
                _ => dump_yaml(self.records)?,
            }
        } else {
            match self.format {
                OutputFormat::Table => render_table(self.records, self.fields),
                OutputFormat::Plain => render_plain(self.records, self.fields),
                OutputFormat::Yaml => dump_yaml(self.records)?,
                OutputFormat::Json => dump_json(self.records)?,
            }
        };
        Ok(indent_lines(&body, self.indent))
    }
}

/// Render `records` through `fields` in `format`, prefixing every line with
/// `indent` spaces.
pub fn render(
    records: &[Value],
    fields: &[FieldSpec],
    format: OutputFormat,
    indent: usize,
) -> ApiResult<String> {
    RenderRequest::new(records, fields)
        .format(format)
        .indent(indent)
        .render()
}

/// Convert a typed schema into a record.
pub fn to_record<T: Serialize>(item: &T) -> ApiResult<Value> {
    serde_json::to_value(item)
        .map_err(|e| ErrorInfo::decode(format!("Failed to convert record: {}", e)))
}

/// Convert typed schemas into records.
pub fn to_records<T: Serialize>(items: &[T]) -> ApiResult<Vec<Value>> {
    items.iter().map(to_record).collect()
}

fn new_table(preset: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(preset);
    table.set_content_arrangement(ContentArrangement::Disabled);
    table
}

fn render_table(records: &[Value], fields: &[FieldSpec]) -> String {
    let mut table = new_table(UTF8_FULL);
    table.set_header(fields.iter().map(|f| f.label.clone()).collect::<Vec<_>>());
    for record in records {
        table.add_row(fields.iter().map(|f| f.render(record)).collect::<Vec<_>>());
    }
    table.to_string()
}

/// A single record is laid out vertically (label, value) so multi-line
/// values stay readable; several records get one compact line each.
fn render_plain(records: &[Value], fields: &[FieldSpec]) -> String {
    let mut table = new_table(NOTHING);
    if let [record] = records {
        for field in fields {
            table.add_row(vec![field.label.clone(), field.render(record)]);
        }
    } else {
        table.set_header(fields.iter().map(|f| f.label.clone()).collect::<Vec<_>>());
        for record in records {
            table.add_row(
                fields
                    .iter()
                    .map(|f| compact(&f.display_values(record)))
                    .collect::<Vec<_>>(),
            );
        }
    }
    table.trim_fmt()
}

fn compact(values: &[String]) -> String {
    values
        .iter()
        .map(|v| v.lines().map(str::trim).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(", ")
}

fn dump_target(records: &[Value]) -> Value {
    match records {
        [record] => record.clone(),
        _ => Value::Array(records.to_vec()),
    }
}

fn dump_yaml(records: &[Value]) -> ApiResult<String> {
    serde_yaml::to_string(&dump_target(records))
        .map(|s| s.trim_end().to_string())
        .map_err(|e| ErrorInfo::decode(format!("Failed to render YAML: {}", e)))
}

fn dump_json(records: &[Value]) -> ApiResult<String> {
    serde_json::to_string_pretty(&dump_target(records))
        .map_err(|e| ErrorInfo::decode(format!("Failed to render JSON: {}", e)))
}

fn indent_lines(text: &str, indent: usize) -> String {
    if indent == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
