//! Settings validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: FilterConfig → Result<(), Vec<ValidationError>>
//! - Runs before any rule source is read

use std::fmt;

use crate::config::schema::FilterConfig;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check value ranges the schema cannot express.
pub fn validate_config(config: &FilterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.rules.paths.is_empty() {
        errors.push(ValidationError {
            field: "rules.paths",
            message: "at least one rule source is required".to_string(),
        });
    }
    if config.rules.watch && config.rules.watch_poll_secs == 0 {
        errors.push(ValidationError {
            field: "rules.watch_poll_secs",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.pipeline.input_capacity == 0 {
        errors.push(ValidationError {
            field: "pipeline.input_capacity",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.pipeline.output_capacity == 0 {
        errors.push(ValidationError {
            field: "pipeline.output_capacity",
            message: "must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
