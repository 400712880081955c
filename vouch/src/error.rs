//! Error types for declaration expansion and test case execution.

use thiserror::Error;

/// Errors raised while expanding a declaration
///
/// These are fatal at suite-construction time: a declaration that cannot be
/// expanded faithfully never produces test cases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A range whose lower bound exceeds its upper bound
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: String, max: String },

    /// A boundary probe would step outside the representable values
    #[error("Invalid range: {bound} has no {direction}")]
    UnboundedProbe {
        bound: String,
        direction: &'static str,
    },

    /// A boundary probe that an integer attribute value cannot hold
    #[error("Invalid range: probe {0} does not fit a 64-bit integer value")]
    UnrepresentableProbe(String),

    /// An exact length that leaves no room for a shorter probe
    #[error("Invalid length: {0} (exact lengths must be > 0)")]
    InvalidLength(usize),

    /// A stepped range with a non-positive step
    #[error("Invalid step: {0} (must be > 0)")]
    InvalidStep(String),

    /// A uniqueness scope whose value cannot be moved to a different one
    #[error("Unsupported scope value for {scope}: {value} has no successor")]
    UnsupportedScopeValue { scope: String, value: String },

    /// A declaration given an empty attribute or value list
    #[error("Empty declaration: {0} requires at least one item")]
    EmptyDeclaration(&'static str),

    /// The default message table could not be loaded
    #[error("Invalid message table: {0}")]
    Messages(String),
}

/// Errors raised when reading or writing a named entity attribute
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("unknown attribute `{attribute}`")]
    Unknown { attribute: String },

    #[error("attribute `{attribute}` expects {expected}, got {found}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: String,
    },
}

/// A failed check inside a single test case
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", format_context(.context))]
pub struct AssertionFailure {
    pub message: String,
    pub context: Option<String>,
}

fn format_context(context: &Option<String>) -> String {
    context
        .as_ref()
        .map(|c| format!(" (context: {})", c))
        .unwrap_or_default()
}

impl AssertionFailure {
    /// Create a failure with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to the failure
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl From<AttributeError> for AssertionFailure {
    fn from(err: AttributeError) -> Self {
        AssertionFailure::new("could not assign attribute").with_context(err.to_string())
    }
}

/// Outcome of a single test case procedure
pub type CheckResult = Result<(), AssertionFailure>;

/// Fail the current check unless `condition` holds
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure::new(message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidRange {
            min: "10".to_string(),
            max: "3".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid range: min 10 is greater than max 3");
        assert_eq!(
            ConfigError::InvalidLength(0).to_string(),
            "Invalid length: 0 (exact lengths must be > 0)"
        );
    }

    #[test]
    fn test_assertion_failure_display() {
        let failure = AssertionFailure::new("expected errors on name");
        assert_eq!(failure.to_string(), "expected errors on name");

        let failure = failure.with_context("set to null");
        assert_eq!(
            failure.to_string(),
            "expected errors on name (context: set to null)"
        );
    }

    #[test]
    fn test_attribute_error_converts_to_failure() {
        let failure: AssertionFailure = AttributeError::Unknown {
            attribute: "nickname".to_string(),
        }
        .into();
        assert_eq!(failure.message, "could not assign attribute");
        assert_eq!(
            failure.context.as_deref(),
            Some("unknown attribute `nickname`")
        );
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, || "unused".to_string()).is_ok());
        let err = ensure(false, || "boom".to_string()).unwrap_err();
        assert_eq!(err.message, "boom");
    }
}
