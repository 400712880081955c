//! Integration tests for loading message tables from JSON files
#![cfg(feature = "serde")]

use std::io::Write;

use vouch::declare::MessageOptions;
use vouch::{
    Attributes, ConfigError, ExpanderConfig, Messages, Model, ModelGroup, OutputFormat, RunConfig,
    Validate, ValidationErrors,
};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default, Attributes)]
struct Note {
    body: String,
}

impl Validate for Note {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.body.is_empty() {
            errors.add("body", "doit être rempli(e)");
        }
        errors
    }
}

impl Model for Note {
    fn type_name() -> &'static str {
        "Note"
    }
}

fn write_json(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_partial_table_keeps_defaults() {
    let file = write_json(r#"{ "blank": "doit être rempli(e)" }"#);
    let messages = Messages::from_json_file(file.path()).unwrap();
    assert_eq!(messages.blank, "doit être rempli(e)");
    assert_eq!(messages.taken, Messages::default().taken);

    let config = ExpanderConfig {
        messages,
        ..ExpanderConfig::default()
    };
    let mut notes = ModelGroup::<Note>::new(config);
    notes
        .should_require_attributes(&["body"], MessageOptions::default())
        .unwrap();
    notes
        .run(&RunConfig::default().with_format(OutputFormat::Quiet))
        .assert_passed();
}

#[test]
fn test_invalid_tables_are_rejected() {
    let file = write_json(r#"{ "blank": "" }"#);
    assert_eq!(
        Messages::from_json_file(file.path()),
        Err(ConfigError::Messages("`blank` is empty".to_string()))
    );

    let file = write_json("not json");
    assert!(matches!(
        Messages::from_json_file(file.path()),
        Err(ConfigError::Messages(_))
    ));

    assert!(Messages::from_json_file("/definitely/not/here.json").is_err());
}
