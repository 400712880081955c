//! Derive macros for the Vouch declaration library
//!
//! This crate provides `#[derive(Attributes)]`, re-exported by `vouch` when
//! its `derive` feature is enabled.

use proc_macro::TokenStream;

mod attributes;

/// Derive macro for named attribute access
///
/// Every named field becomes an attribute readable and assignable through
/// `vouch::Value`. Field types must implement `IntoValue`, `FromValue` and
/// `Clone`.
///
/// # Basic Usage
///
/// ```rust
/// use vouch::Attributes;
///
/// #[derive(Clone, Default, Attributes)]
/// struct User {
///     name: String,
///     age: Option<i64>,
/// }
/// ```
///
/// # Customization
///
/// ```rust
/// use vouch::Attributes;
///
/// #[derive(Clone, Default, Attributes)]
/// struct Account {
///     #[attribute(rename = "login")]
///     username: String,
///     #[attribute(skip)]
///     session: Vec<u8>,
/// }
/// ```
///
/// # Supported Attributes
///
/// - `rename = "name"`: expose the field under a different attribute name
/// - `skip`: do not expose the field
#[proc_macro_derive(Attributes, attributes(attribute))]
pub fn derive_attributes(input: TokenStream) -> TokenStream {
    attributes::derive_attributes_impl(input)
}
