//! Configuration types for declaration expansion and suite execution.
//!
//! Nothing in here is global: an [`ExpanderConfig`] is handed to every
//! declaration group when it is created, and a [`RunConfig`] to every run.

use crate::error::ConfigError;

/// The table of default validation messages
///
/// Declarations fall back to these when no explicit message is given.
/// Templates may contain a `{count}` placeholder which is replaced by the
/// relevant bound.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Messages {
    pub blank: String,
    pub taken: String,
    pub invalid: String,
    pub too_short: String,
    pub too_long: String,
    pub wrong_length: String,
    pub inclusion: String,
    pub not_a_number: String,
    pub accepted: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            blank: "can't be blank".to_string(),
            taken: "has already been taken".to_string(),
            invalid: "is invalid".to_string(),
            too_short: "is too short (minimum is {count} characters)".to_string(),
            too_long: "is too long (maximum is {count} characters)".to_string(),
            wrong_length: "is the wrong length (should be {count} characters)".to_string(),
            inclusion: "is not included in the list".to_string(),
            not_a_number: "is not a number".to_string(),
            accepted: "must be accepted".to_string(),
        }
    }
}

impl Messages {
    /// The too-short message for a minimum length
    pub fn too_short(&self, count: usize) -> String {
        interpolate(&self.too_short, count)
    }

    /// The too-long message for a maximum length
    pub fn too_long(&self, count: usize) -> String {
        interpolate(&self.too_long, count)
    }

    /// The wrong-length message for an exact length
    pub fn wrong_length(&self, count: usize) -> String {
        interpolate(&self.wrong_length, count)
    }

    /// Check that no message is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("blank", &self.blank),
            ("taken", &self.taken),
            ("invalid", &self.invalid),
            ("too_short", &self.too_short),
            ("too_long", &self.too_long),
            ("wrong_length", &self.wrong_length),
            ("inclusion", &self.inclusion),
            ("not_a_number", &self.not_a_number),
            ("accepted", &self.accepted),
        ];
        for (name, message) in fields {
            if message.is_empty() {
                return Err(ConfigError::Messages(format!("`{}` is empty", name)));
            }
        }
        Ok(())
    }

    /// Load a message table from JSON; keys that are absent keep their defaults
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let messages: Messages =
            serde_json::from_str(json).map_err(|e| ConfigError::Messages(e.to_string()))?;
        messages.validate()?;
        Ok(messages)
    }

    /// Load a message table from a JSON file
    #[cfg(feature = "serde")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Messages(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

fn interpolate(template: &str, count: usize) -> String {
    template.replace("{count}", &count.to_string())
}

/// Configuration handed to every declaration group
#[derive(Debug, Clone, PartialEq)]
pub struct ExpanderConfig {
    /// Default validation messages
    pub messages: Messages,
    /// Character used to build length probes
    pub filler: char,
    /// Literal assigned when probing numeric-only attributes
    pub non_numeric_probe: String,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            messages: Messages::default(),
            filler: 'x',
            non_numeric_probe: "abcd".to_string(),
        }
    }
}

impl ExpanderConfig {
    /// Create an expander configuration with validation
    pub fn new(
        messages: Messages,
        filler: char,
        non_numeric_probe: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            messages,
            filler,
            non_numeric_probe: non_numeric_probe.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the expander configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.messages.validate()?;
        if self.non_numeric_probe.trim().parse::<f64>().is_ok() {
            return Err(ConfigError::Messages(format!(
                "non-numeric probe {:?} parses as a number",
                self.non_numeric_probe
            )));
        }
        Ok(())
    }
}

/// Order in which a suite's test cases execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunOrder {
    /// Registration order
    #[default]
    Defined,
    /// Shuffled with the run seed
    Random,
}

/// Output produced while a suite runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// No per-case output
    #[default]
    Quiet,
    /// `cargo test` style lines
    Default,
    /// Check marks with full failure details
    Verbose,
    /// One JSON object per event
    Json,
}

/// Configuration for a single suite run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub order: RunOrder,
    /// Seed for random ordering; drawn from entropy when absent
    pub seed: Option<u64>,
    pub format: OutputFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            order: RunOrder::Defined,
            seed: None,
            format: if crate::runner::Runner::is_verbose_output() {
                OutputFormat::Verbose
            } else {
                OutputFormat::Quiet
            },
        }
    }
}

impl RunConfig {
    /// Run cases in random order with a fixed seed
    pub fn shuffled(seed: u64) -> Self {
        Self {
            order: RunOrder::Random,
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Use the given output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_interpolation() {
        let messages = Messages::default();
        assert_eq!(
            messages.too_short(5),
            "is too short (minimum is 5 characters)"
        );
        assert_eq!(messages.too_long(10), "is too long (maximum is 10 characters)");
        assert_eq!(
            messages.wrong_length(9),
            "is the wrong length (should be 9 characters)"
        );
    }

    #[test]
    fn test_messages_validate() {
        assert!(Messages::default().validate().is_ok());

        let messages = Messages {
            taken: String::new(),
            ..Messages::default()
        };
        assert_eq!(
            messages.validate(),
            Err(ConfigError::Messages("`taken` is empty".to_string()))
        );
    }

    #[test]
    fn test_expander_config_defaults() {
        let config = ExpanderConfig::default();
        assert_eq!(config.filler, 'x');
        assert_eq!(config.non_numeric_probe, "abcd");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_expander_config_rejects_numeric_probe() {
        let result = ExpanderConfig::new(Messages::default(), 'x', "12");
        assert!(matches!(result, Err(ConfigError::Messages(_))));
    }

    #[test]
    fn test_run_config_shuffled() {
        let config = RunConfig::shuffled(7);
        assert_eq!(config.order, RunOrder::Random);
        assert_eq!(config.seed, Some(7));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_message_table() {
        let messages = Messages::from_json_str(r#"{"blank": "est obligatoire"}"#).unwrap();
        assert_eq!(messages.blank, "est obligatoire");
        assert_eq!(messages.taken, Messages::default().taken);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_message_table_rejects_bad_json() {
        assert!(matches!(
            Messages::from_json_str("{"),
            Err(ConfigError::Messages(_))
        ));
    }
}
