//! JSON output formatter

use anyhow::Result;
use serde::Serialize;

pub fn format_value<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
