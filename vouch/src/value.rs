//! Attribute and probe values.
//!
//! Every value that flows between a declaration and a target entity is a
//! [`Value`]. Entities convert their typed fields to and from `Value` through
//! the [`IntoValue`] and [`FromValue`] traits, which the `Attributes` derive
//! relies on.

use std::fmt;

use crate::error::AttributeError;

/// A single scalar value assigned to, or read from, an entity attribute
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Short name of the variant, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Check whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The next value in sequence, used to move a uniqueness scope off an
    /// existing record's value.
    ///
    /// A null scope is assumed to be an unset foreign key and steps to `1`.
    /// Only integers have a successor otherwise.
    pub fn successor(&self) -> Option<Value> {
        match self {
            Value::Null => Some(Value::Int(1)),
            Value::Int(n) => n.checked_add(1).map(Value::Int),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Conversion of a field value into a [`Value`]
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Conversion of a [`Value`] into a typed field value
///
/// Conversions are lenient in the way form input is typecast by a
/// persistence layer: strings accept any scalar, numbers accept numeric text.
pub trait FromValue: Sized {
    fn from_value(attribute: &str, value: Value) -> Result<Self, AttributeError>;
}

fn mismatch(attribute: &str, expected: &'static str, found: &Value) -> AttributeError {
    AttributeError::TypeMismatch {
        attribute: attribute.to_string(),
        expected,
        found: found.to_string(),
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(_attribute: &str, value: Value) -> Result<Self, AttributeError> {
        Ok(value)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl FromValue for String {
    fn from_value(_attribute: &str, value: Value) -> Result<Self, AttributeError> {
        Ok(match value {
            Value::Null => String::new(),
            Value::Text(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(x) => x.to_string(),
        })
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(attribute: &str, value: Value) -> Result<Self, AttributeError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            Value::Text(ref s) => match s.as_str() {
                "1" | "true" | "t" => Ok(true),
                "0" | "false" | "f" => Ok(false),
                _ => Err(mismatch(attribute, "bool", &value)),
            },
            other => Err(mismatch(attribute, "bool", &other)),
        }
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                #[allow(clippy::unnecessary_cast)]
                fn into_value(self) -> Value {
                    // u64/usize values beyond i64::MAX saturate; range declarations reject them first
                    Value::Int(i64::try_from(self).unwrap_or(i64::MAX))
                }
            }

            impl FromValue for $ty {
                fn from_value(attribute: &str, value: Value) -> Result<Self, AttributeError> {
                    let wide = match value {
                        Value::Int(n) => n,
                        Value::Text(ref s) => s
                            .trim()
                            .parse::<i64>()
                            .map_err(|_| mismatch(attribute, stringify!($ty), &value))?,
                        ref other => return Err(mismatch(attribute, stringify!($ty), other)),
                    };
                    <$ty>::try_from(wide).map_err(|_| mismatch(attribute, stringify!($ty), &value))
                }
            }
        )*
    };
}

integer_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_value {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Float(self as f64)
                }
            }

            impl FromValue for $ty {
                fn from_value(attribute: &str, value: Value) -> Result<Self, AttributeError> {
                    match value {
                        Value::Float(x) => Ok(x as $ty),
                        Value::Int(n) => Ok(n as $ty),
                        Value::Text(ref s) => s
                            .trim()
                            .parse::<$ty>()
                            .map_err(|_| mismatch(attribute, stringify!($ty), &value)),
                        ref other => Err(mismatch(attribute, stringify!($ty), other)),
                    }
                }
            }
        )*
    };
}

float_value!(f32, f64);

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(attribute: &str, value: Value) -> Result<Self, AttributeError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(attribute, other).map(Some),
        }
    }
}

macro_rules! from_value_impls {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.into_value()
                }
            }
        )*
    };
}

from_value_impls!(String, &str, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: IntoValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.into_value()
    }
}
