//! First-match rule evaluation.
//!
//! # Template Placeholders
//! - `$k`: capture group `k`, where `k` is every digit following the `$`
//! - `${k}`: the same, for a group followed by literal digits
//! - Groups that exist but did not participate expand to the empty string
//! - Indices past the last group stay literal

use regex::Captures;

use crate::rewrite::outcome::RewriteResult;
use crate::rules::{Action, RuleSet};

/// Log target of the per-evaluation trace enabled by `loglevel debug`.
pub const TRACE_TARGET: &str = "rewrite";

/// Evaluate `url` against `rules`, stopping at the first matching rule.
pub fn evaluate(url: &str, rules: &RuleSet) -> RewriteResult {
    let result = rules
        .rules()
        .iter()
        .find_map(|rule| {
            rule.pattern().captures(url).map(|caps| {
                let target = escape_quotes(&substitute(rule.target(), &caps));
                match rule.action() {
                    Action::Rewrite => RewriteResult::Rewritten(target),
                    Action::Redirect(status) => RewriteResult::Redirected(status, target),
                }
            })
        })
        .unwrap_or(RewriteResult::NoMatch);

    if rules.debug() {
        tracing::info!(target: TRACE_TARGET, url = %url, outcome = %result, "rewrite");
    }

    result
}

/// Expand `$k` / `${k}` placeholders in `template` from `caps`.
///
/// Single pass: inserted group text is not scanned again.
pub fn substitute(template: &str, caps: &Captures<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match parse_placeholder(after) {
            Some((index, consumed)) if index < caps.len() => {
                if let Some(m) = caps.get(index) {
                    out.push_str(m.as_str());
                }
                rest = &after[consumed..];
            }
            Some((_, consumed)) => {
                // Out of range: keep the placeholder text as written.
                out.push('$');
                out.push_str(&after[..consumed]);
                rest = &after[consumed..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Parse the group index after a `$`. Returns the index and bytes consumed.
fn parse_placeholder(s: &str) -> Option<(usize, usize)> {
    let (digits, consumed) = match s.strip_prefix('{') {
        Some(inner) => {
            let close = inner.find('}')?;
            let digits = &inner[..close];
            (digits, close + 2)
        }
        None => {
            let end = s
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(s.len());
            (&s[..end], end)
        }
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // An index too large for usize can never name a group.
    let index = digits.parse::<usize>().unwrap_or(usize::MAX);
    Some((index, consumed))
}

fn escape_quotes(url: &str) -> String {
    url.replace('"', "%22")
}
