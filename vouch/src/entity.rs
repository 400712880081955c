//! The target entity contract.
//!
//! A target entity is any record-like value with named attributes and a
//! validation step. Implement [`Attributes`] (or derive it) and
//! [`Validate`], and the type participates in every model declaration.

use std::fmt;

use crate::error::AttributeError;
use crate::value::Value;

/// Per-attribute validation errors, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    /// Create an empty error collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against an attribute
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        let attribute = attribute.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(name, _)| *name == attribute) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((attribute, vec![message])),
        }
    }

    /// Messages recorded against an attribute
    pub fn on(&self, attribute: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    /// Check whether no errors were recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of messages across all attributes
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }

    /// Iterate over `(attribute, message)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, messages)| {
            messages
                .iter()
                .map(move |message| (name.as_str(), message.as_str()))
        })
    }

    /// Messages prefixed with their attribute name
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .map(|(name, message)| format!("{} {}", name, message))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

/// Named attribute access
///
/// Usually derived with `#[derive(Attributes)]`.
pub trait Attributes {
    /// Names of every settable attribute
    fn attribute_names(&self) -> &'static [&'static str];

    /// Read an attribute, `None` when the name is unknown
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Assign an attribute
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), AttributeError>;

    /// Check whether the attribute can be assigned
    fn responds_to(&self, name: &str) -> bool {
        self.attribute_names().contains(&name)
    }
}

/// A validation step producing per-attribute errors
pub trait Validate {
    fn validate(&self) -> ValidationErrors;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Everything a declaration needs from a target entity
pub trait Entity: Attributes + Validate + Clone + Default + 'static {}

impl<T> Entity for T where T: Attributes + Validate + Clone + Default + 'static {}

/// Where each test case gets its entity from
///
/// A seeded subject hands every case its own clone of a specially configured
/// instance; a fresh subject default-constructs one per case.
#[derive(Debug, Clone, Default)]
pub enum Subject<E> {
    #[default]
    Fresh,
    Seeded(E),
}

impl<E: Entity> Subject<E> {
    /// Default-construct an instance per case
    pub fn fresh() -> Self {
        Subject::Fresh
    }

    /// Clone the given instance per case
    pub fn seeded(instance: E) -> Self {
        Subject::Seeded(instance)
    }

    /// Resolve a new instance for one test case
    pub fn instance(&self) -> E {
        match self {
            Subject::Fresh => E::default(),
            Subject::Seeded(instance) => instance.clone(),
        }
    }

    /// Check whether the subject carries a seed instance
    pub fn is_seeded(&self) -> bool {
        matches!(self, Subject::Seeded(_))
    }
}

impl<E: Entity> From<E> for Subject<E> {
    fn from(instance: E) -> Self {
        Subject::Seeded(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FromValue;

    #[derive(Debug, Clone, Default)]
    struct Product {
        price: i64,
        tangible: bool,
    }

    impl Attributes for Product {
        fn attribute_names(&self) -> &'static [&'static str] {
            &["price", "tangible"]
        }

        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "price" => Some(Value::Int(self.price)),
                "tangible" => Some(Value::Bool(self.tangible)),
                _ => None,
            }
        }

        fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), AttributeError> {
            match name {
                "price" => self.price = i64::from_value(name, value)?,
                "tangible" => self.tangible = bool::from_value(name, value)?,
                _ => {
                    return Err(AttributeError::Unknown {
                        attribute: name.to_string(),
                    });
                }
            }
            Ok(())
        }
    }

    impl Validate for Product {
        fn validate(&self) -> ValidationErrors {
            let mut errors = ValidationErrors::new();
            if self.tangible && self.price <= 0 {
                errors.add("price", "must be greater than 0");
            }
            errors
        }
    }

    #[test]
    fn test_validation_errors_grouping() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");
        errors.add("email", "is invalid");
        errors.add("name", "is too short (minimum is 3 characters)");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.on("name").len(), 2);
        assert_eq!(errors.on("email"), ["is invalid".to_string()]);
        assert!(errors.on("age").is_empty());
        assert_eq!(
            errors.full_messages(),
            vec![
                "name can't be blank",
                "name is too short (minimum is 3 characters)",
                "email is invalid",
            ]
        );
    }

    #[test]
    fn test_subject_resolution() {
        let fresh: Subject<Product> = Subject::fresh();
        assert!(!fresh.instance().tangible);
        assert!(fresh.instance().is_valid());

        let seeded = Subject::seeded(Product {
            price: 0,
            tangible: true,
        });
        assert!(seeded.is_seeded());
        assert!(!seeded.instance().is_valid());
    }

    #[test]
    fn test_responds_to() {
        let product = Product::default();
        assert!(product.responds_to("price"));
        assert!(!product.responds_to("colour"));
    }
}
