use anyhow::{Context, Result};
use fincat_finance::{MatchStrategy, ProcessorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_config_path, ensure_parent};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub pipeline: ProcessorConfig,
}

/// `--config` if given, else `~/.fincat/config.toml`
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    ensure_parent(path)?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write a default config unless one exists. Returns true if a file was written.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(false);
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(true)
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub keywords: Option<PathBuf>,
    pub monthly: Option<bool>,
    pub weekly: Option<bool>,
    pub full: Option<bool>,
    pub strategy: Option<MatchStrategy>,
    pub total_row: Option<bool>,
}

impl Overrides {
    pub fn apply(self, cfg: &mut ProcessorConfig) {
        if let Some(p) = self.input {
            cfg.input_dir = p;
        }
        if let Some(p) = self.output {
            cfg.output_dir = p;
        }
        if let Some(p) = self.keywords {
            cfg.keyword_file = p;
        }
        if let Some(v) = self.monthly {
            cfg.exports.monthly = v;
        }
        if let Some(v) = self.weekly {
            cfg.exports.weekly = v;
        }
        if let Some(v) = self.full {
            cfg.exports.full = v;
        }
        if let Some(s) = self.strategy {
            cfg.match_strategy = s;
        }
        if let Some(v) = self.total_row {
            cfg.summary_total_row = v;
        }
    }
}
