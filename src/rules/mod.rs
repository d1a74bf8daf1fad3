//! Rule compilation subsystem.
//!
//! # Data Flow
//! ```text
//! rule sources (install-local, site-wide, system-wide)
//!     → compiler.rs (read present sources in priority order, tokenize lines)
//!     → Rule (compiled pattern + template + action)
//!     → RuleSet (ordered, immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - All present sources are merged; a missing source is skipped
//! - Line order across the merge is evaluation priority
//! - Any malformed line or bad pattern aborts compilation entirely
//! - A RuleSet is never edited: reload builds a new one

pub mod compiler;
pub mod rule;

pub use compiler::{compile_str, CompileError, RuleCompiler};
pub use rule::{Action, Rule, RuleSet, StatusClass};
