//! Declaring validations for a user model and printing the run
//!
//! Run with `cargo run --example user_model`.

use vouch::declare::{LengthRangeOptions, MessageOptions, UniqueOptions};
use vouch::{
    Attributes, Messages, Model, ModelGroup, OutputFormat, RunConfig, Validate, ValidationErrors,
    Value,
};

#[derive(Debug, Clone, Default, Attributes)]
struct User {
    name: String,
    email: String,
    age: Value,
}

impl Validate for User {
    fn validate(&self) -> ValidationErrors {
        let messages = Messages::default();
        let mut errors = ValidationErrors::new();
        match self.name.chars().count() {
            0 => errors.add("name", messages.blank.as_str()),
            n if n < 3 => errors.add("name", messages.too_short(3)),
            n if n > 10 => errors.add("name", messages.too_long(10)),
            _ => {}
        }
        if self.email == "admin@example.com" {
            errors.add("email", messages.taken.as_str());
        }
        if let Value::Text(text) = &self.age
            && text.parse::<i64>().is_err()
        {
            errors.add("age", messages.not_a_number.as_str());
        }
        errors
    }
}

impl Model for User {
    fn type_name() -> &'static str {
        "User"
    }

    fn first_record() -> Option<Self> {
        Some(User {
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            age: Value::Int(42),
        })
    }
}

fn main() {
    tracing_subscriber::fmt().init();

    let mut users = ModelGroup::<User>::default();
    let declared = users
        .should_require_attributes(&["name"], MessageOptions::default())
        .and_then(|g| g.should_ensure_length_in_range("name", 3..=10, LengthRangeOptions::default()))
        .and_then(|g| g.should_only_allow_numeric_values_for(&["age"], MessageOptions::default()))
        .and_then(|g| g.should_require_unique_attributes(&["email"], UniqueOptions::default()));
    if let Err(err) = declared {
        eprintln!("invalid declaration: {}", err);
        std::process::exit(2);
    }

    let report = users.run(&RunConfig::default().with_format(OutputFormat::Default));
    println!("{}", report);
    if !report.is_success() {
        std::process::exit(1);
    }
}
