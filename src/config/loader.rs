//! Settings loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::FilterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for settings loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse settings from TOML text without validating.
pub fn parse_config(content: &str) -> Result<FilterConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Read settings from a TOML file without validating.
pub fn read_config(path: &Path) -> Result<FilterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Load and validate settings from a TOML file.
pub fn load_config(path: &Path) -> Result<FilterConfig, ConfigError> {
    let config = read_config(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Command-line values layered over the settings file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `rules.paths` when non-empty.
    pub rules: Vec<PathBuf>,
    /// Forces `rules.watch` on.
    pub watch: bool,
    pub log_filter: Option<String>,
}

/// Apply overrides to `base`, then validate the merged settings.
pub fn resolve_config(
    mut base: FilterConfig,
    overrides: ConfigOverrides,
) -> Result<FilterConfig, ConfigError> {
    if !overrides.rules.is_empty() {
        base.rules.paths = overrides.rules;
    }
    if overrides.watch {
        base.rules.watch = true;
    }
    if let Some(filter) = overrides.log_filter {
        base.logging.filter = filter;
    }

    validate_config(&base).map_err(ConfigError::Validation)?;

    Ok(base)
}
