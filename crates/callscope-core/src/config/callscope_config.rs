//! Top-level callscope configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{GraphConfig, ImpactConfig, ScanConfig};
use crate::constants::{PROJECT_CONFIG_FILE, PYTHON_EXTENSIONS};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CALLSCOPE_*`)
/// 3. Project config (`callscope.toml` in the analysis root)
/// 4. User config (`~/.callscope/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CallscopeConfig {
    pub scan: ScanConfig,
    pub graph: GraphConfig,
    pub impact: ImpactConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub scan_threads: Option<usize>,
    pub graph_max_body_chars: Option<usize>,
    pub impact_max_depth: Option<u32>,
}

impl CallscopeConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::Malformed { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(path = %user_config_path.display(), %err, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Malformed {
            origin: "inline TOML".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &CallscopeConfig) -> Result<(), ConfigError> {
        for ext in config.scan.extensions.iter().flatten() {
            if !PYTHON_EXTENSIONS.contains(&ext.as_str()) {
                return Err(ConfigError::Invalid {
                    field: "scan.extensions",
                    message: format!(
                        "unsupported extension '{ext}', expected one of {PYTHON_EXTENSIONS:?}"
                    ),
                });
            }
        }
        if config.graph.max_body_chars == Some(0) {
            return Err(ConfigError::Invalid {
                field: "graph.max_body_chars",
                message: "must be greater than 0".to_string(),
            });
        }
        if config.impact.max_depth == Some(0) {
            return Err(ConfigError::Invalid {
                field: "impact.max_depth",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.callscope/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".callscope").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CallscopeConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file_config: CallscopeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Malformed {
                origin: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, file_config);
        Ok(())
    }

    /// Layer `upper` over `base`: set values in `upper` win.
    fn merge(base: &mut CallscopeConfig, upper: CallscopeConfig) {
        if upper.scan.extensions.as_ref().is_some_and(|e| !e.is_empty()) {
            base.scan.extensions = upper.scan.extensions;
        }
        base.scan.threads = upper.scan.threads.or(base.scan.threads);
        base.graph.max_body_chars = upper.graph.max_body_chars.or(base.graph.max_body_chars);
        base.impact.max_depth = upper.impact.max_depth.or(base.impact.max_depth);
        base.impact.snippet_chars = upper.impact.snippet_chars.or(base.impact.snippet_chars);
    }

    /// `CALLSCOPE_<SECTION>_<KEY>` overrides. Unparseable values are skipped.
    fn apply_env_overrides(config: &mut CallscopeConfig) {
        if let Ok(val) = std::env::var("CALLSCOPE_SCAN_EXTENSIONS") {
            let exts: Vec<String> = val
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !exts.is_empty() {
                config.scan.extensions = Some(exts);
            }
        }
        env_override(&mut config.scan.threads, "CALLSCOPE_SCAN_THREADS");
        env_override(&mut config.graph.max_body_chars, "CALLSCOPE_GRAPH_MAX_BODY_CHARS");
        env_override(&mut config.impact.max_depth, "CALLSCOPE_IMPACT_MAX_DEPTH");
        env_override(&mut config.impact.snippet_chars, "CALLSCOPE_IMPACT_SNIPPET_CHARS");
    }

    fn apply_cli_overrides(config: &mut CallscopeConfig, cli: &CliOverrides) {
        config.scan.threads = cli.scan_threads.or(config.scan.threads);
        config.graph.max_body_chars = cli.graph_max_body_chars.or(config.graph.max_body_chars);
        config.impact.max_depth = cli.impact_max_depth.or(config.impact.max_depth);
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }
}

fn env_override<T: std::str::FromStr>(slot: &mut Option<T>, key: &str) {
    match std::env::var(key).map(|raw| raw.trim().parse::<T>()) {
        Ok(Ok(value)) => *slot = Some(value),
        Ok(Err(_)) => tracing::warn!(key, "ignoring unparseable environment override"),
        Err(_) => {}
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
