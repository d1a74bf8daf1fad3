//! Rewrite evaluation subsystem.
//!
//! # Data Flow
//! ```text
//! url + Arc<RuleSet>
//!     → engine.rs (first matching rule, template substitution, quote escaping)
//!     → RewriteResult (NoMatch | Rewritten | Redirected)
//!     → Outcome (result + mirrored request id)
//! ```
//!
//! # Design Decisions
//! - Evaluation is a pure function of (url, rule set)
//! - First match wins; later rules are never consulted
//! - Substituted URLs never contain a raw `"`

pub mod engine;
pub mod outcome;

pub use engine::{evaluate, substitute, TRACE_TARGET};
pub use outcome::{Outcome, RewriteResult};
