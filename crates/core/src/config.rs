use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::included::IncludedData;
use crate::model::level::Level;
use crate::render::Culture;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub included_data: IncludedData,
    pub min_level: Level,
    pub service_name: String,
    pub culture: Culture,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            included_data: IncludedData::DEFAULT,
            min_level: Level::Verbose,
            service_name: "unknown_service".to_string(),
            culture: Culture::invariant(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides();
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    included_data: Option<String>,
    min_level: Option<String>,
    service_name: Option<String>,
    decimal_separator: Option<String>,
    group_separator: Option<String>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("LOGBRIDGE_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("logbridge/config.toml")
}

fn load_file_overrides(path: &PathBuf) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| BridgeError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| BridgeError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> ConfigOverrides {
    ConfigOverrides {
        included_data: env::var("LOGBRIDGE_INCLUDED_DATA").ok(),
        min_level: env::var("LOGBRIDGE_MIN_LEVEL").ok(),
        service_name: env::var("LOGBRIDGE_SERVICE_NAME").ok(),
        decimal_separator: env::var("LOGBRIDGE_DECIMAL_SEPARATOR").ok(),
        group_separator: env::var("LOGBRIDGE_GROUP_SEPARATOR").ok(),
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.included_data {
        cfg.included_data = v.parse().map_err(|e| {
            BridgeError::Config(format!("bad included_data in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.min_level {
        cfg.min_level = v.parse().map_err(|e| {
            BridgeError::Config(format!("bad min_level in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.service_name {
        cfg.service_name = v;
    }
    if let Some(v) = overrides.decimal_separator {
        cfg.culture.decimal_separator = parse_separator(&v).map_err(|e| {
            BridgeError::Config(format!("bad decimal_separator in {source}: {e}"))
        })?;
    }
    if let Some(v) = overrides.group_separator {
        cfg.culture.group_separator = parse_separator(&v).map_err(|e| {
            BridgeError::Config(format!("bad group_separator in {source}: {e}"))
        })?;
    }
    Ok(())
}

fn parse_separator(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_ascii_digit() => Ok(c),
        _ => Err(BridgeError::Config(format!(
            "separator must be a single non-digit character (value={raw})"
        ))),
    }
}
