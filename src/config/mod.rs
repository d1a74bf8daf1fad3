//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize, layer CLI overrides)
//!     → validation.rs (semantic checks on the merged result)
//!     → FilterConfig (validated, immutable)
//!
//! With rules.watch enabled:
//!     watcher.rs detects a rule source change
//!     → ReloadRequest to the supervisor
//! ```
//!
//! # Design Decisions
//! - Settings are read once at startup; only rule sources reload
//! - All fields have defaults to allow minimal settings files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, read_config, resolve_config, ConfigError, ConfigOverrides};
pub use schema::{FilterConfig, LoggingConfig, PipelineConfig, RulesConfig};
pub use watcher::RuleWatcher;
