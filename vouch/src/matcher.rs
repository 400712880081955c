//! Error indicators: the literal message or pattern a check looks for in an
//! attribute's error collection.

use std::fmt;

use regex::Regex;

/// An expected validation error message
///
/// A literal only matches an identical entry. A pattern matches when at least
/// one entry in the collection matches it.
#[derive(Debug, Clone)]
pub enum ErrorMatcher {
    Exact(String),
    Pattern(Regex),
}

impl ErrorMatcher {
    /// Build a pattern matcher from a regular expression source
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(ErrorMatcher::Pattern)
    }

    /// A pattern matching every message
    ///
    /// Used as the error to avoid for good values: the attribute must not
    /// have any error at all.
    pub fn any() -> Self {
        ErrorMatcher::Pattern(Regex::new("").expect("empty pattern is valid"))
    }

    /// Check a single message
    pub fn matches(&self, message: &str) -> bool {
        match self {
            ErrorMatcher::Exact(expected) => expected == message,
            ErrorMatcher::Pattern(regex) => regex.is_match(message),
        }
    }

    /// Check whether any message in the collection matches
    pub fn matches_any<S: AsRef<str>>(&self, messages: &[S]) -> bool {
        messages.iter().any(|m| self.matches(m.as_ref()))
    }

    /// The first matching message, if any
    pub fn find<'a, S: AsRef<str>>(&self, messages: &'a [S]) -> Option<&'a str> {
        messages
            .iter()
            .map(AsRef::as_ref)
            .find(|m| self.matches(m))
    }

    /// Check whether this matcher is a pattern
    pub fn is_pattern(&self) -> bool {
        matches!(self, ErrorMatcher::Pattern(_))
    }
}

impl fmt::Display for ErrorMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMatcher::Exact(message) => write!(f, "{:?}", message),
            ErrorMatcher::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl PartialEq for ErrorMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ErrorMatcher::Exact(a), ErrorMatcher::Exact(b)) => a == b,
            (ErrorMatcher::Pattern(a), ErrorMatcher::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<&str> for ErrorMatcher {
    fn from(message: &str) -> Self {
        ErrorMatcher::Exact(message.to_string())
    }
}

impl From<String> for ErrorMatcher {
    fn from(message: String) -> Self {
        ErrorMatcher::Exact(message)
    }
}

impl From<Regex> for ErrorMatcher {
    fn from(regex: Regex) -> Self {
        ErrorMatcher::Pattern(regex)
    }
}
