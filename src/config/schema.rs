//! Settings schema definitions.
//!
//! Every field has a default so an absent or partial settings file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Rule source file name looked up in every default location.
pub const RULES_FILE_NAME: &str = "squid-urlrewrite.conf";

/// Root settings for the filter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    /// Rule sources and reload behaviour.
    pub rules: RulesConfig,

    /// Queue sizes between reader, stages and writer.
    pub pipeline: PipelineConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Rule source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Sources in priority order. All present sources are merged.
    pub paths: Vec<PathBuf>,

    /// Reload automatically when a source changes on disk.
    pub watch: bool,

    /// Poll interval for watcher backends that poll, in seconds.
    pub watch_poll_secs: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            paths: default_rule_paths(),
            watch: false,
            watch_poll_secs: 2,
        }
    }
}

/// Install-local, then site-wide, then system-wide.
pub fn default_rule_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        paths.push(dir.join(RULES_FILE_NAME));
    }
    paths.push(PathBuf::from("/usr/local/etc").join(RULES_FILE_NAME));
    paths.push(PathBuf::from("/etc").join(RULES_FILE_NAME));
    paths
}

/// Pipeline queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Lines buffered between the input reader and the active stage.
    pub input_capacity: usize,

    /// Outcomes buffered before producers wait on the writer.
    pub output_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_capacity: 100,
            output_capacity: 10 * 1024,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,

    /// Colorize log output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "url_rewriter=info".to_string(),
            ansi: false,
        }
    }
}
