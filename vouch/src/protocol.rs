//! The good/bad value assertion protocol.
//!
//! Each assertion resolves an entity from a [`Subject`], assigns the probe
//! value, validates, and checks the attribute's errors. All of this happens
//! inside the registered procedure, so every test case works on its own
//! instance and reports on its own.

use tracing::debug;

use crate::entity::{Entity, Subject, ValidationErrors};
use crate::error::{AssertionFailure, CheckResult};
use crate::group::{Expectation, TestCase};
use crate::matcher::ErrorMatcher;
use crate::reflection::Model;
use crate::value::Value;

/// Resolve an instance, assign `value` to `attribute` and validate it
pub fn assign_and_validate<E: Entity>(
    subject: &Subject<E>,
    attribute: &str,
    value: &Value,
) -> Result<(E, ValidationErrors), AssertionFailure> {
    let mut instance = subject.instance();
    instance
        .set_attribute(attribute, value.clone())
        .map_err(|err| {
            AssertionFailure::new(format!("could not set {} to {}", attribute, value))
                .with_context(err.to_string())
        })?;
    let errors = instance.validate();
    Ok((instance, errors))
}

fn render(messages: &[String]) -> String {
    format!("{:?}", messages)
}

/// Check that the collection contains the expected error
pub fn contains_error(attribute: &str, messages: &[String], expected: &ErrorMatcher) -> CheckResult {
    if expected.matches_any(messages) {
        return Ok(());
    }
    let message = match expected {
        ErrorMatcher::Pattern(_) => format!(
            "expected an error on {} matching {}, got {}",
            attribute,
            expected,
            render(messages)
        ),
        ErrorMatcher::Exact(_) => format!(
            "expected errors on {} to include {}, got {}",
            attribute,
            expected,
            render(messages)
        ),
    };
    Err(AssertionFailure::new(message))
}

/// Check that the collection does not contain the error
pub fn lacks_error(attribute: &str, messages: &[String], avoided: &ErrorMatcher) -> CheckResult {
    let Some(found) = avoided.find(messages) else {
        return Ok(());
    };
    let message = match avoided {
        ErrorMatcher::Pattern(_) => format!(
            "expected no error on {} matching {}, found {:?}",
            attribute, avoided, found
        ),
        ErrorMatcher::Exact(_) => format!(
            "expected errors on {} not to include {}",
            attribute, avoided
        ),
    };
    Err(AssertionFailure::new(message))
}

/// Register the single check that `value` is accepted for `attribute`
///
/// The check fails when the attribute's errors contain `error_to_avoid`.
/// Pass [`ErrorMatcher::any`] to require that the attribute has no errors.
pub fn assert_good_value<E: Entity>(
    subject: &Subject<E>,
    attribute: &str,
    value: impl Into<Value>,
    error_to_avoid: impl Into<ErrorMatcher>,
) -> Vec<TestCase> {
    let value = value.into();
    let avoided = error_to_avoid.into();
    debug!(attribute, %value, matcher = %avoided, "registering good value check");

    let description = format!("should not have error {} when set to {}", avoided, value);
    let subject = subject.clone();
    let attribute = attribute.to_string();
    vec![TestCase::new(description, Expectation::Accepts, move || {
        let (_, errors) = assign_and_validate(&subject, &attribute, &value)?;
        lacks_error(&attribute, errors.on(&attribute), &avoided)
            .map_err(|f| f.with_context(format!("when set to {}", value)))
    })]
}

/// Register the three checks that `value` is rejected for `attribute`:
/// the entity is invalid, the attribute has errors, and those errors contain
/// `error_to_expect`
pub fn assert_bad_value<E: Entity>(
    subject: &Subject<E>,
    attribute: &str,
    value: impl Into<Value>,
    error_to_expect: impl Into<ErrorMatcher>,
) -> Vec<TestCase> {
    let value = value.into();
    let expected = error_to_expect.into();
    debug!(attribute, %value, matcher = %expected, "registering bad value checks");

    let invalid = {
        let subject = subject.clone();
        let attribute = attribute.to_string();
        let value = value.clone();
        TestCase::new(
            format!("should not allow {} as a value for {}", value, attribute),
            Expectation::Rejects,
            move || {
                let (instance, _) = assign_and_validate(&subject, &attribute, &value)?;
                if instance.is_valid() {
                    Err(AssertionFailure::new(format!(
                        "expected entity to be invalid with {} set to {}",
                        attribute, value
                    )))
                } else {
                    Ok(())
                }
            },
        )
    };

    let has_errors = {
        let subject = subject.clone();
        let attribute = attribute.to_string();
        let value = value.clone();
        TestCase::new(
            format!(
                "should have errors on {} after being set to {}",
                attribute, value
            ),
            Expectation::Rejects,
            move || {
                let (_, errors) = assign_and_validate(&subject, &attribute, &value)?;
                if errors.on(&attribute).is_empty() {
                    let mut failure =
                        AssertionFailure::new(format!("expected errors on {}, got none", attribute));
                    if !errors.is_empty() {
                        failure = failure.with_context(format!("other errors: {}", errors));
                    }
                    Err(failure)
                } else {
                    Ok(())
                }
            },
        )
    };

    let has_expected = {
        let subject = subject.clone();
        let attribute = attribute.to_string();
        TestCase::new(
            format!("should have error {} when set to {}", expected, value),
            Expectation::Rejects,
            move || {
                let (_, errors) = assign_and_validate(&subject, &attribute, &value)?;
                contains_error(&attribute, errors.on(&attribute), &expected)
            },
        )
    };

    vec![invalid, has_errors, has_expected]
}

/// Register a check that the subject's instance is valid as it stands
pub fn assert_valid<E: Entity>(subject: &Subject<E>) -> TestCase {
    let subject = subject.clone();
    TestCase::new("should be valid", Expectation::Accepts, move || {
        let errors = subject.instance().validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AssertionFailure::new(format!("Errors: {}", errors)))
        }
    })
}

/// Register the check that the subject saves through [`Model::save`]
pub fn assert_save<M: Model>(subject: &Subject<M>) -> TestCase {
    let subject = subject.clone();
    TestCase::new("should save correctly", Expectation::Accepts, move || {
        let mut instance = subject.instance();
        instance
            .save()
            .map_err(|errors| AssertionFailure::new(format!("Errors: {}", errors)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Attributes, Validate};
    use crate::error::AttributeError;
    use crate::value::FromValue;

    #[derive(Debug, Clone, Default)]
    struct Account {
        name: String,
        age: Value,
    }

    impl Attributes for Account {
        fn attribute_names(&self) -> &'static [&'static str] {
            &["name", "age"]
        }

        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::Text(self.name.clone())),
                "age" => Some(self.age.clone()),
                _ => None,
            }
        }

        fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), AttributeError> {
            match name {
                "name" => self.name = String::from_value(name, value)?,
                "age" => self.age = value,
                _ => {
                    return Err(AttributeError::Unknown {
                        attribute: name.to_string(),
                    });
                }
            }
            Ok(())
        }
    }

    impl Validate for Account {
        fn validate(&self) -> ValidationErrors {
            let mut errors = ValidationErrors::new();
            if self.name.is_empty() {
                errors.add("name", "can't be blank");
            } else if self.name.len() < 5 {
                errors.add("name", "is too short (minimum is 5 characters)");
            }
            if let Value::Text(_) = self.age {
                errors.add("age", "is not a number");
            }
            errors
        }
    }

    fn outcomes(cases: &[TestCase]) -> Vec<bool> {
        cases.iter().map(|c| c.run().is_ok()).collect()
    }

    fn seeded() -> Subject<Account> {
        Subject::seeded(Account {
            name: "valid name".to_string(),
            age: Value::Null,
        })
    }

    #[test]
    fn test_bad_value_yields_three_cases() {
        let cases = assert_bad_value(&seeded(), "name", "abc", "is too short (minimum is 5 characters)");
        assert_eq!(cases.len(), 3);
        assert!(cases.iter().all(|c| c.expectation() == Expectation::Rejects));
        assert_eq!(outcomes(&cases), vec![true, true, true]);
        assert_eq!(
            cases[0].description(),
            "should not allow \"abc\" as a value for name"
        );
        assert_eq!(
            cases[1].description(),
            "should have errors on name after being set to \"abc\""
        );
        assert_eq!(
            cases[2].description(),
            "should have error \"is too short (minimum is 5 characters)\" when set to \"abc\""
        );
    }

    #[test]
    fn test_good_value_yields_one_case() {
        let cases = assert_good_value(&seeded(), "name", "abcdef", ErrorMatcher::any());
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].expectation(), Expectation::Accepts);
        assert_eq!(
            cases[0].description(),
            "should not have error // when set to \"abcdef\""
        );
        assert!(cases[0].run().is_ok());
    }

    #[test]
    fn test_bad_value_reports_each_check_independently() {
        // "abcdef" is acceptable, so all three checks fail on their own
        let cases = assert_bad_value(&seeded(), "name", "abcdef", "can't be blank");
        assert_eq!(outcomes(&cases), vec![false, false, false]);

        // the entity is invalid because of another attribute, the name checks still fail
        let subject = Subject::seeded(Account {
            name: "valid name".to_string(),
            age: Value::from("ten"),
        });
        let cases = assert_bad_value(&subject, "name", "abcdef", "can't be blank");
        assert_eq!(outcomes(&cases), vec![true, false, false]);
        let failure = cases[1].run().unwrap_err();
        assert_eq!(failure.message, "expected errors on name, got none");
        assert_eq!(
            failure.context.as_deref(),
            Some("other errors: age is not a number")
        );
    }

    #[test]
    fn test_pattern_and_literal_matching() {
        let pattern = ErrorMatcher::pattern("too short").unwrap();
        let cases = assert_bad_value(&seeded(), "name", "abc", pattern);
        assert!(cases[2].run().is_ok());

        let cases = assert_bad_value(&seeded(), "name", "abc", "too short");
        let failure = cases[2].run().unwrap_err();
        assert_eq!(
            failure.message,
            "expected errors on name to include \"too short\", got [\"is too short (minimum is 5 characters)\"]"
        );

        let cases = assert_bad_value(&seeded(), "name", "abc", ErrorMatcher::pattern("blank").unwrap());
        let failure = cases[2].run().unwrap_err();
        assert!(failure.message.starts_with("expected an error on name matching /blank/"));
    }

    #[test]
    fn test_good_value_failure_wording() {
        let cases = assert_good_value(&seeded(), "name", "ab", ErrorMatcher::pattern("short").unwrap());
        let failure = cases[0].run().unwrap_err();
        assert_eq!(
            failure.message,
            "expected no error on name matching /short/, found \"is too short (minimum is 5 characters)\""
        );
        assert_eq!(failure.context.as_deref(), Some("when set to \"ab\""));

        let cases = assert_good_value(&seeded(), "name", "", "can't be blank");
        let failure = cases[0].run().unwrap_err();
        assert_eq!(
            failure.message,
            "expected errors on name not to include \"can't be blank\""
        );
    }

    #[test]
    fn test_fresh_subject_and_numeric_probe() {
        let cases = assert_bad_value(&Subject::<Account>::fresh(), "age", "abcd", "is not a number");
        assert_eq!(outcomes(&cases), vec![true, true, true]);
    }

    #[test]
    fn test_unknown_attribute_fails_the_case() {
        let cases = assert_good_value(&seeded(), "nickname", "bob", ErrorMatcher::any());
        let failure = cases[0].run().unwrap_err();
        assert_eq!(failure.message, "could not set nickname to \"bob\"");
        assert_eq!(
            failure.context.as_deref(),
            Some("unknown attribute `nickname`")
        );
    }

    #[test]
    fn test_cases_do_not_share_instances() {
        let subject = seeded();
        let bad = assert_bad_value(&subject, "name", Value::Null, "can't be blank");
        let good = assert_good_value(&subject, "name", "abcdef", ErrorMatcher::any());
        assert_eq!(outcomes(&good), vec![true]);
        assert_eq!(outcomes(&bad), vec![true, true, true]);
        assert_eq!(outcomes(&good), vec![true]);
    }

    #[test]
    fn test_assert_valid() {
        assert!(assert_valid(&seeded()).run().is_ok());
        let failure = assert_valid(&Subject::<Account>::fresh()).run().unwrap_err();
        assert_eq!(failure.message, "Errors: name can't be blank");
    }
}
