//! # Vouch - Declarative Validation Tests for Rust
//!
//! Vouch turns one-line declarations about a model ("name must be 3 to 10
//! characters", "ssn is exactly 9 characters", "email is unique per
//! account") into independent, described test cases. Each validation
//! declaration derives boundary probes, assigns them to a fresh or seeded
//! instance and checks the validation errors on the attribute.
//!
//! ## Quick Start
//!
//! ```rust
//! use vouch::{Attributes, Model, ModelGroup, Validate, ValidationErrors};
//! use vouch::declare::{MessageOptions, LengthRangeOptions};
//!
//! #[derive(Debug, Clone, Default, Attributes)]
//! struct User {
//!     name: String,
//! }
//!
//! impl Validate for User {
//!     fn validate(&self) -> ValidationErrors {
//!         let mut errors = ValidationErrors::new();
//!         match self.name.chars().count() {
//!             0 => errors.add("name", "can't be blank"),
//!             n if n < 3 => errors.add("name", "is too short (minimum is 3 characters)"),
//!             n if n > 10 => errors.add("name", "is too long (maximum is 10 characters)"),
//!             _ => {}
//!         }
//!         errors
//!     }
//! }
//!
//! impl Model for User {
//!     fn type_name() -> &'static str {
//!         "User"
//!     }
//! }
//!
//! let mut users = ModelGroup::<User>::default();
//! users
//!     .should_require_attributes(&["name"], MessageOptions::default())
//!     .unwrap()
//!     .should_ensure_length_in_range("name", 3..=10, LengthRangeOptions::default())
//!     .unwrap();
//!
//! let report = users.run_default();
//! report.assert_passed();
//! assert_eq!(report.reports.len(), 11);
//! ```

// Lets the derive macro's `::vouch::` paths resolve inside this crate's tests
extern crate self as vouch;

pub mod config;
pub mod declare;
pub mod entity;
pub mod error;
pub mod group;
mod macros;
pub mod matcher;
pub mod probe;
pub mod protocol;
pub mod reflection;
pub mod response;
pub mod runner;
pub mod value;

pub use config::{ExpanderConfig, Messages, OutputFormat, RunConfig, RunOrder};
pub use declare::{ControllerGroup, ModelGroup, ViewGroup};
pub use entity::{Attributes, Entity, Subject, Validate, ValidationErrors};
pub use error::{AssertionFailure, AttributeError, CheckResult, ConfigError, ensure};
pub use group::{ExampleGroup, Expectation, TestCase};
pub use matcher::ErrorMatcher;
pub use protocol::{assert_bad_value, assert_good_value, assert_save, assert_valid};
pub use reflection::{
    Catalog, Column, Dependent, Index, Model, Relationship, RelationshipKind, Table,
};
pub use response::Response;
pub use runner::{
    CaseFormatter, CaseOutcome, CaseReport, DefaultFormatter, JsonFormatter, Runner, SuiteReport,
    VerboseFormatter,
};
pub use value::{FromValue, IntoValue, Value};

// Re-export derive macro from separate crate when derive feature is enabled
#[cfg(feature = "derive")]
pub use vouch_derive::Attributes;
