//! Rule source parsing and compilation.
//!
//! # Source Format
//! ```text
//! # comment
//! loglevel debug
//! rewrite  <regex> <template>
//! redirect <regex> [301;|302;]<template>
//! ```
//!
//! # Responsibilities
//! - Read every present source in priority order and merge their lines
//! - Compile patterns and split redirect status prefixes
//! - Report the first malformed line with source name and 1-based line number

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

use crate::rules::rule::{Action, Rule, RuleSet, StatusClass};

/// Errors that abort rule compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Unrecognized line shape or wrong token count.
    #[error("configure parse error: {source_name}:{line}: format error")]
    Format { source_name: String, line: usize },

    /// The pattern of a rule line is not a valid regular expression.
    #[error("configure pattern error: {source_name}:{line}: {error}")]
    Pattern {
        source_name: String,
        line: usize,
        #[source]
        error: regex::Error,
    },

    /// A present source could not be read to the end.
    #[error("reading configure file error: {source_name}: {error}")]
    Read {
        source_name: String,
        #[source]
        error: io::Error,
    },
}

impl CompileError {
    /// 1-based line number of the offending line, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::Format { line, .. } | CompileError::Pattern { line, .. } => Some(*line),
            CompileError::Read { .. } => None,
        }
    }
}

/// Compiles the ordered list of rule sources into a [`RuleSet`].
#[derive(Debug, Clone)]
pub struct RuleCompiler {
    sources: Vec<PathBuf>,
}

impl RuleCompiler {
    /// Create a compiler over sources listed in priority order.
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Read all present sources and build a fresh rule set.
    pub fn compile(&self) -> Result<RuleSet, CompileError> {
        let mut builder = RuleSetBuilder::default();
        let mut loaded = 0usize;

        for path in &self.sources {
            let Some(text) = read_source(path)? else {
                continue;
            };
            builder.ingest(&path.display().to_string(), &text)?;
            loaded += 1;
        }

        let rules = builder.build();
        tracing::info!(
            sources = loaded,
            rules = rules.len(),
            debug = rules.debug(),
            "Rule set compiled"
        );
        Ok(rules)
    }
}

/// Compile a single in-memory source.
pub fn compile_str(source_name: &str, text: &str) -> Result<RuleSet, CompileError> {
    let mut builder = RuleSetBuilder::default();
    builder.ingest(source_name, text)?;
    Ok(builder.build())
}

/// Returns `Ok(None)` for a source that is absent or cannot be opened.
fn read_source(path: &Path) -> Result<Option<String>, CompileError> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Rule source not present, skipping");
            return Ok(None);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Rule source unreadable, skipping");
            return Ok(None);
        }
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|error| CompileError::Read {
        source_name: path.display().to_string(),
        error,
    })?;
    // Legacy encodings in comments must not stop the helper.
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

#[derive(Default)]
struct RuleSetBuilder {
    rules: Vec<Rule>,
    debug: bool,
}

impl RuleSetBuilder {
    fn ingest(&mut self, source_name: &str, text: &str) -> Result<(), CompileError> {
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let lineno = idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                ["loglevel", level] => {
                    if *level == "debug" {
                        self.debug = true;
                    }
                }
                [kind @ ("rewrite" | "redirect"), pattern, target] => {
                    let pattern = Regex::new(pattern).map_err(|error| CompileError::Pattern {
                        source_name: source_name.to_string(),
                        line: lineno,
                        error,
                    })?;
                    let rule = if *kind == "redirect" {
                        let (status, template) = StatusClass::split_target(target);
                        Rule::new(pattern, template, Action::Redirect(status))
                    } else {
                        Rule::new(pattern, *target, Action::Rewrite)
                    };
                    self.rules.push(rule);
                }
                _ => {
                    return Err(CompileError::Format {
                        source_name: source_name.to_string(),
                        line: lineno,
                    })
                }
            }
        }
        Ok(())
    }

    fn build(self) -> RuleSet {
        RuleSet::new(self.rules, self.debug)
    }
}
