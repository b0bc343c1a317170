use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};

use crate::model::Config;

/// Load a JSON config file. Missing keys take their defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&json).with_context(|| format!("invalid config {}", path.display()))
}

pub fn parse_config(json: &str) -> Result<Config> {
    let config: Config = serde_json::from_str(json).context("failed to parse config JSON")?;
    ensure!(
        config.typing_speed_ms > 0,
        "typing_speed_ms must be positive"
    );
    Ok(config)
}
