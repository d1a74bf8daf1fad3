//! Compiled rule types.

use std::fmt;

use regex::Regex;

/// HTTP status class sent back with a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusClass {
    /// 301 Moved Permanently.
    MovedPermanently,
    /// 302 Found.
    #[default]
    Found,
}

impl StatusClass {
    /// Numeric HTTP status code.
    pub fn code(self) -> u16 {
        match self {
            StatusClass::MovedPermanently => 301,
            StatusClass::Found => 302,
        }
    }

    /// Split a recognized `301;` / `302;` prefix off a redirect target.
    ///
    /// Targets without a recognized prefix default to 302.
    pub fn split_target(target: &str) -> (Self, &str) {
        if let Some(rest) = target.strip_prefix("301;") {
            (StatusClass::MovedPermanently, rest)
        } else if let Some(rest) = target.strip_prefix("302;") {
            (StatusClass::Found, rest)
        } else {
            (StatusClass::Found, target)
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What a matching rule does with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Rewrite,
    Redirect(StatusClass),
}

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    target: String,
    action: Action,
}

impl Rule {
    pub fn new(pattern: Regex, target: impl Into<String>, action: Action) -> Self {
        Self {
            pattern,
            target: target.into(),
            action,
        }
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Target template with `$N` placeholders (status prefix already stripped).
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

/// Ordered, immutable list of rules in effect at one instant.
///
/// Rule order is evaluation priority: the first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    debug: bool,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>, debug: bool) -> Self {
        Self { rules, debug }
    }

    /// An empty rule set (every URL is a no-match).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// True when a source contained `loglevel debug`.
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
