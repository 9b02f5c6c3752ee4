use anyhow::{Context, Result};
use cellbook_core::EngineConfig;
use directories::ProjectDirs;
use log::debug;
use std::path::{Path, PathBuf};

pub(crate) fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellbook")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Resolve the engine configuration. An explicit path must exist; the
/// default location is optional.
pub(crate) fn load_config(explicit: Option<&Path>, no_config: bool) -> Result<EngineConfig> {
    if let Some(path) = explicit {
        return EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    if no_config {
        return Ok(EngineConfig::default());
    }
    match default_config_path() {
        Some(path) if path.is_file() => {
            debug!("using config {}", path.display());
            EngineConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        _ => Ok(EngineConfig::default()),
    }
}
