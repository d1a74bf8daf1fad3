//! URL rewrite helper for caching proxies.
//!
//! Reads one URL per line, matches it against an ordered rule set and answers
//! with no-change, a rewritten URL or a redirect. The rule set reloads live.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod protocol;
pub mod rewrite;
pub mod rules;

pub use config::FilterConfig;
pub use lifecycle::{Supervisor, SupervisorError};
pub use rules::{RuleCompiler, RuleSet};
