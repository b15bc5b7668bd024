//! Check command implementation

use std::path::Path;

use tracing::info;

use crate::config::{CliConfig, ConfigError};
use crate::Result;

/// Print the resolved configuration
pub fn run(config: &CliConfig, source: &Path) -> Result<()> {
    info!("Checking configuration...");
    let origin = if source.exists() {
        source.display().to_string()
    } else {
        "defaults".to_string()
    };
    let text = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::FileError(format!("Failed to render TOML: {}", e)))?;
    println!("# fxhedge {} (from {origin})", env!("CARGO_PKG_VERSION"));
    println!("{text}");
    Ok(())
}
