//! Output line formatting.

use crate::rewrite::{Outcome, RewriteResult};

/// Render one outcome as a protocol line, without the trailing newline.
pub fn format_outcome(outcome: &Outcome) -> String {
    let prefix = match &outcome.id {
        Some(id) => format!("{} ", id),
        None => String::new(),
    };

    match &outcome.result {
        RewriteResult::NoMatch => format!("{}ERR", prefix),
        RewriteResult::Rewritten(url) => format!("{}OK rewrite-url=\"{}\"", prefix, url),
        RewriteResult::Redirected(status, url) => {
            format!("{}OK status={} url=\"{}\"", prefix, status, url)
        }
    }
}
