//! Configuration management for topsnap.
//!
//! This module handles loading, merging, and validating configuration from
//! files and CLI arguments. It supports YAML, JSON, and TOML formats with
//! the precedence CLI > config file > defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{Args, ConfigFormat};

/// Idle-flush default: disabled.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 0;

/// Config file locations probed when no explicit path is given.
const CONFIG_SEARCH_PATHS: &[&str] = &[
    "topsnap.yaml",
    "topsnap.yml",
    "topsnap.json",
    "topsnap.toml",
    "/etc/topsnap/config.yaml",
    "/etc/topsnap/config.yml",
    "/etc/topsnap/config.json",
    "/etc/topsnap/config.toml",
];

/// Effective configuration (all fields optional so file values and CLI
/// overrides can be told apart from defaults).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Human-formatted JSON output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    /// Emit only the summary portion of each snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<bool>,

    /// Drop process rows whose %CPU is not greater than zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<bool>,

    /// Trailing-flush delay in milliseconds (0 = disabled)
    #[serde(alias = "idle-timeout-ms", skip_serializing_if = "Option::is_none")]
    pub idle_timeout_ms: Option<u64>,

    /// Logging
    #[serde(alias = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty: Some(false),
            summary: Some(false),
            filter: Some(false),
            idle_timeout_ms: Some(DEFAULT_IDLE_TIMEOUT_MS),
            log_level: Some("info".into()),
        }
    }
}

/// Loads a config file, trying the search path when no explicit file is given.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(format!("config file not found: {}", path.display()).into());
            }
            Some(path.to_path_buf())
        }
        None => CONFIG_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists()),
    };

    let Some(path) = path else {
        return Ok(Config::default());
    };

    info!("Loading config from {}", path.display());
    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    let mut config: Config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&contents)
            .map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))?,
        Some("toml") => toml::from_str(&contents)
            .map_err(|e| format!("invalid TOML in {}: {}", path.display(), e))?,
        // YAML is the default, and a superset of JSON anyway.
        _ => serde_yaml::from_str(&contents)
            .map_err(|e| format!("invalid YAML in {}: {}", path.display(), e))?,
    };

    // Fill in defaults for anything the file left unset.
    let defaults = Config::default();
    config.pretty = config.pretty.or(defaults.pretty);
    config.summary = config.summary.or(defaults.summary);
    config.filter = config.filter.or(defaults.filter);
    config.idle_timeout_ms = config.idle_timeout_ms.or(defaults.idle_timeout_ms);
    config.log_level = config.log_level.or(defaults.log_level);

    Ok(config)
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Boolean flags only override when set on the CLI.
    if args.pretty {
        config.pretty = Some(true);
    }
    if args.summary {
        config.summary = Some(true);
    }
    if args.filter {
        config.filter = Some(true);
    }
    if let Some(ms) = args.idle_timeout_ms {
        config.idle_timeout_ms = Some(ms);
    }

    Ok(config)
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(format!(
                    "Invalid log_level '{}', expected one of off/error/warn/info/debug/trace",
                    other
                )
                .into());
            }
        }
    }

    Ok(())
}

/// Serializes the effective config in the requested format for --show-config.
pub fn show_config(
    cfg: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let rendered = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(cfg)?,
        ConfigFormat::Json => serde_json::to_string_pretty(cfg)?,
        ConfigFormat::Toml => toml::to_string(cfg)?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse_args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("topsnap").chain(argv.iter().copied()))
    }

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.pretty, Some(false));
        assert_eq!(config.summary, Some(false));
        assert_eq!(config.filter, Some(false));
        assert_eq!(config.idle_timeout_ms, Some(0));
        assert_eq!(config.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn cli_overrides_file_value() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "pretty: false\nidle-timeout-ms: 250").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = parse_args(&["--config", &path, "--pretty"]);
        let config = resolve_config(&args).unwrap();

        // CLI flag wins over the file.
        assert_eq!(config.pretty, Some(true));
        // File value wins over the default.
        assert_eq!(config.idle_timeout_ms, Some(250));
        // Untouched settings fall back to defaults.
        assert_eq!(config.filter, Some(false));
    }

    #[test]
    fn loads_toml_config_by_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "summary = true").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.summary, Some(true));
        assert_eq!(config.pretty, Some(false));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let args = parse_args(&["--config", "/nonexistent/topsnap.yaml"]);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn no_config_skips_file_loading() {
        let args = parse_args(&["--no-config"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.pretty, Some(false));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = Config {
            log_level: Some("loud".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_err());
        assert!(validate_effective_config(&Config::default()).is_ok());
    }

    #[test]
    fn show_config_round_trips_through_every_format() {
        let config = Config::default();
        for format in [ConfigFormat::Yaml, ConfigFormat::Json, ConfigFormat::Toml] {
            let rendered = show_config(&config, &format).unwrap();
            assert!(rendered.contains("idle_timeout_ms"), "{rendered}");
        }
    }
}
