//! Result rendering.

use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use crate::Result;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Renders `value` as JSON or through `table`.
pub fn render<T, F>(value: &T, format: OutputFormat, table: F) -> Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Table => table(value),
    })
}

/// Writes `text` to `output`, or to stdout when `None`.
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!("Results written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// `"N/A"` for a missing percentage.
pub fn percent_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}%"))
}
