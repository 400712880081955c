//! Declarative macros for whole declaration suites.

/// Declare a model suite as a single `#[test]` function
///
/// Each declaration is a [`ModelGroup`](crate::ModelGroup) method call. An
/// invalid declaration panics with its configuration error before anything
/// runs; otherwise every case runs and the test fails listing each failing
/// case.
///
/// Optional bracketed settings follow the type, in this order:
/// `[config = ...]`, `[seed = ...]`, `[catalog = ...]`.
///
/// # Examples
///
/// ```rust
/// use vouch::{describe_model, Attributes, Model, Validate, ValidationErrors};
/// use vouch::declare::MessageOptions;
///
/// #[derive(Debug, Clone, Default, Attributes)]
/// struct Tag {
///     label: String,
/// }
///
/// impl Validate for Tag {
///     fn validate(&self) -> ValidationErrors {
///         let mut errors = ValidationErrors::new();
///         if self.label.is_empty() {
///             errors.add("label", "can't be blank");
///         }
///         errors
///     }
/// }
///
/// impl Model for Tag {
///     fn type_name() -> &'static str {
///         "Tag"
///     }
/// }
///
/// describe_model! {
///     fn tag_declarations for Tag [seed = Tag { label: "rust".into() }] {
///         should_require_attributes(&["label"], MessageOptions::default());
///         should_allow_values_for("label", &["a", "b"]);
///     }
/// }
/// # fn main() {}
/// ```
#[macro_export]
macro_rules! describe_model {
    (
        $(#[$meta:meta])*
        fn $name:ident for $model:ty
        $([config = $config:expr])?
        $([seed = $seed:expr])?
        $([catalog = $catalog:expr])?
        {
            $($declaration:ident($($arg:expr),* $(,)?);)*
        }
    ) => {
        $(#[$meta])*
        #[test]
        fn $name() {
            let config = $crate::ExpanderConfig::default();
            $(let config = $config;)?
            let group = $crate::ModelGroup::<$model>::new(config);
            $(let group = group.with_seed($seed);)?
            $(let group = group.with_catalog($catalog);)?
            let mut group = group;
            $(
                if let Err(err) = group.$declaration($($arg),*) {
                    panic!("invalid declaration {}: {}", stringify!($declaration), err);
                }
            )*
            group.run(&$crate::RunConfig::default()).assert_passed();
        }
    };
}

/// Run a group and panic listing every failing case
///
/// Accepts anything that exposes an [`ExampleGroup`](crate::ExampleGroup):
/// the group itself or a model, controller or view group.
///
/// # Examples
///
/// ```rust
/// use vouch::{assert_group, ExampleGroup, RunConfig};
///
/// let mut group = ExampleGroup::new("arithmetic");
/// group.it("adds", || vouch::ensure(1 + 1 == 2, || "math is broken".to_string()));
///
/// assert_group!(group);
/// assert_group!(group, RunConfig::shuffled(42));
/// ```
#[macro_export]
macro_rules! assert_group {
    ($group:expr) => {
        $crate::assert_group!($group, $crate::RunConfig::default())
    };
    ($group:expr, $config:expr) => {
        $crate::Runner::run(
            ::core::convert::AsRef::<$crate::ExampleGroup>::as_ref(&$group),
            &$config,
        )
        .assert_passed()
    };
}

#[cfg(test)]
mod tests {
    use crate::{ExampleGroup, RunConfig};

    #[test]
    fn test_assert_group_passes() {
        let mut group = ExampleGroup::new("macro");
        group.it("holds", || Ok(()));
        assert_group!(group);
        assert_group!(group, RunConfig::shuffled(3));
    }

    #[test]
    #[should_panic(expected = "1 of 1 cases failed")]
    fn test_assert_group_fails() {
        let mut group = ExampleGroup::new("macro");
        group.it("fails", || Err(crate::AssertionFailure::new("nope")));
        assert_group!(group);
    }
}
