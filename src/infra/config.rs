//! Configuration loading from disk.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::Config;

/// Load the configuration, falling back to defaults if no file exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if
/// the loaded options fail validation.
pub fn load() -> Result<Config> {
    let path = path()?;
    let config = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))?
    } else {
        Config::default()
    };
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Config file location: `$SANDCASTLE_CONFIG` or `~/.sandcastle/config.yaml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn path() -> Result<PathBuf> {
    if let Ok(val) = std::env::var("SANDCASTLE_CONFIG") {
        return Ok(PathBuf::from(val));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".sandcastle").join("config.yaml"))
}
