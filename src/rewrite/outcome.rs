//! Evaluation results.

use std::fmt;

use crate::rules::StatusClass;

/// Result of evaluating one URL against a rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteResult {
    /// No rule matched; the proxy keeps the original URL.
    NoMatch,
    /// The URL is rewritten transparently.
    Rewritten(String),
    /// The client is redirected to the URL.
    Redirected(StatusClass, String),
}

impl fmt::Display for RewriteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteResult::NoMatch => write!(f, "NO CHANGE"),
            RewriteResult::Rewritten(url) => write!(f, "{}", url),
            RewriteResult::Redirected(status, url) => write!(f, "{} {}", status, url),
        }
    }
}

/// One answer for one request.
///
/// `id` is present exactly when the originating request carried one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub id: Option<String>,
    pub result: RewriteResult,
}

impl Outcome {
    pub fn new(id: Option<String>, result: RewriteResult) -> Self {
        Self { id, result }
    }
}
