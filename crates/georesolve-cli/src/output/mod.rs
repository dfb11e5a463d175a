//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use anyhow::Result;
use serde::Serialize;

/// Render `value` as pretty JSON or through its terminal formatter
pub fn render<T, F>(value: &T, format: OutputFormat, terminal: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => json::format_value(value),
        OutputFormat::Cli => Ok(terminal(value)),
    }
}
