use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn fincat_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".fincat"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(fincat_home()?.join("config.toml"))
}

/// Create the parent directory of `path` if it has one
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    Ok(())
}
