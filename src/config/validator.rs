//! Configuration validation rules.
//!
//! - At least one category, each with a name
//! - Every step has a non-empty name and command
//! - Step names are unique across categories
//! - Timeouts are positive
//!
//! Unknown `depends_on` names are not errors here; they surface as
//! warnings when the run resolves its order.

use crate::config::schema::DotstepConfig;
use crate::error::{DotstepError, Result};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Step name if error is step-specific
    pub step: Option<String>,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &DotstepConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.categories.is_empty() {
        errors.push(ValidationError {
            rule: "no-categories",
            message: "Configuration must define at least one category".to_string(),
            step: None,
        });
    }

    let mut seen = HashSet::new();

    for (idx, category) in config.categories.iter().enumerate() {
        if category.name.trim().is_empty() {
            errors.push(ValidationError {
                rule: "unnamed-category",
                message: format!("Category #{} has no name", idx + 1),
                step: None,
            });
        }

        for step in &category.steps {
            if step.name.trim().is_empty() {
                errors.push(ValidationError {
                    rule: "unnamed-step",
                    message: format!("A step in category '{}' has no name", category.name),
                    step: None,
                });
                continue;
            }

            if !seen.insert(step.name.as_str()) {
                errors.push(ValidationError {
                    rule: "duplicate-step",
                    message: format!("Step '{}' is defined more than once", step.name),
                    step: Some(step.name.clone()),
                });
            }

            if step.command.trim().is_empty() {
                errors.push(ValidationError {
                    rule: "missing-command",
                    message: format!("Step '{}' must have a command", step.name),
                    step: Some(step.name.clone()),
                });
            }

            if step.timeout == Some(0) {
                errors.push(ValidationError {
                    rule: "zero-timeout",
                    message: format!("Step '{}' has a timeout of 0 seconds", step.name),
                    step: Some(step.name.clone()),
                });
            }
        }
    }

    errors
}

/// Validate a configuration, failing with every problem in one error.
pub fn validate(config: &DotstepConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(DotstepError::ConfigValidationError { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CategoryConfig, StepConfig};

    fn step(name: &str, command: &str) -> StepConfig {
        StepConfig {
            name: name.to_string(),
            command: command.to_string(),
            ..Default::default()
        }
    }

    fn config(steps: Vec<StepConfig>) -> DotstepConfig {
        DotstepConfig {
            categories: vec![CategoryConfig {
                name: "Main".to_string(),
                steps,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        let config = config(vec![step("a", "true"), step("b", "true")]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn empty_config_fails() {
        let errors = validate_config(&DotstepConfig::default());
        assert_eq!(errors[0].rule, "no-categories");
    }

    #[test]
    fn duplicate_names_across_categories_fail() {
        let mut config = config(vec![step("a", "true")]);
        config.categories.push(CategoryConfig {
            name: "Other".to_string(),
            steps: vec![step("a", "true")],
        });

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "duplicate-step"));
    }

    #[test]
    fn missing_command_fails() {
        let errors = validate_config(&config(vec![step("a", "  ")]));
        assert_eq!(errors[0].rule, "missing-command");
        assert_eq!(errors[0].step.as_deref(), Some("a"));
    }

    #[test]
    fn zero_timeout_fails() {
        let mut s = step("a", "true");
        s.timeout = Some(0);
        let errors = validate_config(&config(vec![s]));
        assert_eq!(errors[0].rule, "zero-timeout");
    }

    #[test]
    fn unknown_dependency_is_not_an_error() {
        let mut s = step("a", "true");
        s.depends_on = vec!["ghost".to_string()];
        assert!(validate(&config(vec![s])).is_ok());
    }

    #[test]
    fn validate_joins_all_messages() {
        let err = validate(&config(vec![step("", "true"), step("b", "")])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("has no name"));
        assert!(msg.contains("must have a command"));
    }
}
