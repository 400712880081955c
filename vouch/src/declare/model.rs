//! Model declarations.
//!
//! A [`ModelGroup`] expands one-line declarations about a [`Model`] into
//! described groups of test cases. Validation declarations go through the
//! boundary probes and the good/bad value protocol; metadata declarations
//! check relationships, columns and indexes directly.

use std::fmt::Display;
use std::ops::RangeInclusive;

use num_traits::{Num, PrimInt, ToPrimitive};
use tracing::{debug, warn};

use crate::config::{ExpanderConfig, RunConfig};
use crate::entity::{Attributes, Subject};
use crate::error::{AssertionFailure, ConfigError, ensure};
use crate::group::{ExampleGroup, Expectation, TestCase};
use crate::matcher::ErrorMatcher;
use crate::probe::{self, Probe};
use crate::protocol::{assert_bad_value, assert_good_value, assert_save, assert_valid};
use crate::reflection::{
    Catalog, Dependent, Model, Relationship, RelationshipKind, foreign_key, tableize,
};
use crate::runner::{Runner, SuiteReport};
use crate::value::{IntoValue, Value};

/// Options for declarations with a single message override
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    pub message: Option<ErrorMatcher>,
}

impl MessageOptions {
    /// Expect the given message instead of the default
    pub fn message(message: impl Into<ErrorMatcher>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// Options for uniqueness declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniqueOptions {
    pub message: Option<ErrorMatcher>,
    /// Attributes the uniqueness is scoped to
    pub scoped_to: Vec<String>,
}

impl UniqueOptions {
    pub fn scoped_to<S: AsRef<str>>(scopes: &[S]) -> Self {
        Self {
            message: None,
            scoped_to: scopes.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// Options for length range declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LengthRangeOptions {
    pub short_message: Option<ErrorMatcher>,
    pub long_message: Option<ErrorMatcher>,
}

/// Options for minimum length declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinimumLengthOptions {
    pub short_message: Option<ErrorMatcher>,
}

/// Options for value range declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRangeOptions {
    pub low_message: Option<ErrorMatcher>,
    pub high_message: Option<ErrorMatcher>,
}

/// Options for `has_many` declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HasManyOptions {
    pub through: Option<String>,
    pub dependent: Option<Dependent>,
}

/// Options for `has_one` declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HasOneOptions {
    pub dependent: Option<Dependent>,
}

/// Options for declaring several columns at once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnsOptions {
    pub sql_type: Option<String>,
}

/// Expected properties of a single column; only the given ones are checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOptions {
    pub sql_type: Option<String>,
    /// `Some(None)` checks that the column has no default
    pub default: Option<Option<String>>,
    pub nullable: Option<bool>,
    pub limit: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub primary: Option<bool>,
}

impl ColumnOptions {
    fn is_empty(&self) -> bool {
        *self == ColumnOptions::default()
    }

    fn describe(&self) -> Vec<(&'static str, String)> {
        let mut options = Vec::new();
        if let Some(sql_type) = &self.sql_type {
            options.push(("sql_type", sql_type.clone()));
        }
        if let Some(default) = &self.default {
            options.push(("default", format!("{:?}", default)));
        }
        if let Some(nullable) = self.nullable {
            options.push(("null", nullable.to_string()));
        }
        if let Some(limit) = self.limit {
            options.push(("limit", limit.to_string()));
        }
        if let Some(precision) = self.precision {
            options.push(("precision", precision.to_string()));
        }
        if let Some(scale) = self.scale {
            options.push(("scale", scale.to_string()));
        }
        if let Some(primary) = self.primary {
            options.push(("primary", primary.to_string()));
        }
        options
    }
}

fn require_items<T>(items: &[T], declaration: &'static str) -> Result<(), ConfigError> {
    if items.is_empty() {
        Err(ConfigError::EmptyDeclaration(declaration))
    } else {
        Ok(())
    }
}

/// Declarations about a model type
///
/// ```rust
/// use vouch::{Attributes, ModelGroup, Model, Validate, ValidationErrors};
/// use vouch::declare::model::LengthRangeOptions;
///
/// #[derive(Debug, Clone, Default, Attributes)]
/// struct User {
///     name: String,
/// }
///
/// impl Validate for User {
///     fn validate(&self) -> ValidationErrors {
///         let mut errors = ValidationErrors::new();
///         if self.name.len() < 3 {
///             errors.add("name", "is too short (minimum is 3 characters)");
///         } else if self.name.len() > 10 {
///             errors.add("name", "is too long (maximum is 10 characters)");
///         }
///         errors
///     }
/// }
///
/// impl Model for User {
///     fn type_name() -> &'static str {
///         "User"
///     }
/// }
///
/// let mut users = ModelGroup::<User>::default();
/// users
///     .should_ensure_length_in_range("name", 3..=10, LengthRangeOptions::default())
///     .unwrap();
/// users.run_default().assert_passed();
/// ```
pub struct ModelGroup<M: Model> {
    group: ExampleGroup,
    config: ExpanderConfig,
    subject: Subject<M>,
    catalog: Catalog,
}

impl<M: Model> Default for ModelGroup<M> {
    fn default() -> Self {
        Self::new(ExpanderConfig::default())
    }
}

impl<M: Model> AsRef<ExampleGroup> for ModelGroup<M> {
    fn as_ref(&self) -> &ExampleGroup {
        &self.group
    }
}

impl<M: Model> ModelGroup<M> {
    /// Create a group for `M` described by its type name
    pub fn new(config: ExpanderConfig) -> Self {
        Self {
            group: ExampleGroup::new(M::type_name()),
            config,
            subject: Subject::fresh(),
            catalog: Catalog::new().register::<M>(),
        }
    }

    /// Use a specially configured instance instead of `M::default()` for
    /// validation declarations
    pub fn with_seed(mut self, instance: M) -> Self {
        self.subject = Subject::seeded(instance);
        self
    }

    /// Use the given schema catalog for relationship checks
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog.register::<M>();
        self
    }

    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    pub fn group(&self) -> &ExampleGroup {
        &self.group
    }

    pub fn into_group(self) -> ExampleGroup {
        self.group
    }

    /// Run every registered case
    pub fn run(&self, config: &RunConfig) -> SuiteReport {
        Runner::run(&self.group, config)
    }

    /// Run every registered case with the default run configuration
    pub fn run_default(&self) -> SuiteReport {
        self.run(&RunConfig::default())
    }

    fn nest(&mut self, group: ExampleGroup) -> &mut Self {
        debug!(
            model = M::type_name(),
            declaration = group.description(),
            cases = group.len(),
            "expanded declaration"
        );
        self.group.nest(group);
        self
    }

    fn bad(&self, attribute: &str, value: impl Into<Value>, message: &ErrorMatcher) -> Vec<TestCase> {
        assert_bad_value(&self.subject, attribute, value, message.clone())
    }

    fn good(&self, attribute: &str, value: impl Into<Value>, message: &ErrorMatcher) -> Vec<TestCase> {
        assert_good_value(&self.subject, attribute, value, message.clone())
    }

    fn probe_cases<T: IntoValue + Clone>(
        &self,
        attribute: &str,
        probe: &Probe<T>,
        message: &ErrorMatcher,
    ) -> Vec<TestCase> {
        let value = probe.value.clone().into_value();
        if probe.is_invalid() {
            self.bad(attribute, value, message)
        } else {
            self.good(attribute, value, message)
        }
    }

    fn described(description: impl Into<String>, cases: Vec<TestCase>) -> ExampleGroup {
        let mut group = ExampleGroup::new(description);
        group.extend(cases);
        group
    }

    // ------------------------------------------------------------------
    // Validation declarations
    // ------------------------------------------------------------------

    /// Each attribute must be present
    pub fn should_require_attributes<S: AsRef<str>>(
        &mut self,
        attributes: &[S],
        options: MessageOptions,
    ) -> Result<&mut Self, ConfigError> {
        require_items(attributes, "should_require_attributes")?;
        let message = options
            .message
            .unwrap_or_else(|| self.config.messages.blank.as_str().into());

        for attribute in attributes {
            let attribute = attribute.as_ref();
            let cases = self.bad(attribute, Value::Null, &message);
            self.nest(Self::described(
                format!("requires {} to be set", attribute),
                cases,
            ));
        }
        Ok(self)
    }

    /// Each attribute must be unique among persisted records, optionally
    /// within a scope
    ///
    /// Needs an existing record from [`Model::first_record`]. Without one only
    /// the failing "should have one record" case is registered.
    pub fn should_require_unique_attributes<S: AsRef<str>>(
        &mut self,
        attributes: &[S],
        options: UniqueOptions,
    ) -> Result<&mut Self, ConfigError> {
        require_items(attributes, "should_require_unique_attributes")?;
        let message = options
            .message
            .unwrap_or_else(|| self.config.messages.taken.as_str().into());
        let scopes = options.scoped_to;

        let existing = M::first_record();
        let successors = match &existing {
            Some(existing) => scopes
                .iter()
                .map(|scope| {
                    let current = existing.attribute(scope).unwrap_or(Value::Null);
                    current
                        .successor()
                        .ok_or_else(|| ConfigError::UnsupportedScopeValue {
                            scope: scope.clone(),
                            value: current.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        for attribute in attributes {
            let attribute = attribute.as_ref();
            let mut description = format!("requires unique value for {}", attribute);
            if !scopes.is_empty() {
                description.push_str(&format!(" scoped to {}", scopes.join(", ")));
            }
            let mut group = ExampleGroup::new(description);

            let found = existing.is_some();
            group.it(
                format!(
                    "should have one {} record in the database in order to test",
                    M::type_name()
                ),
                move || {
                    ensure(found, || {
                        format!("no {} record found to compare against", M::type_name())
                    })
                },
            );

            let Some(existing) = &existing else {
                warn!(
                    model = M::type_name(),
                    attribute, "no existing record, skipping uniqueness checks"
                );
                self.nest(group);
                continue;
            };

            let existing_value = existing.attribute(attribute).unwrap_or(Value::Null);
            let mut object = M::default();

            for scope in &scopes {
                let responds = object.responds_to(scope);
                group.it(format!("should have a {} attribute", scope), move || {
                    ensure(responds, || "attribute is not assignable".to_string())
                });
                let scope_value = existing.attribute(scope).unwrap_or(Value::Null);
                if let Err(err) = object.set_attribute(scope, scope_value) {
                    debug!(scope = scope.as_str(), %err, "could not copy scope value");
                }
            }

            group.extend(assert_bad_value(
                &Subject::seeded(object.clone()),
                attribute,
                existing_value.clone(),
                message.clone(),
            ));

            for (scope, next) in scopes.iter().zip(&successors) {
                if let Err(err) = object.set_attribute(scope, next.clone()) {
                    debug!(scope = scope.as_str(), %err, "could not move scope value");
                }
                group.extend(assert_good_value(
                    &Subject::seeded(object.clone()),
                    attribute,
                    existing_value.clone(),
                    message.clone(),
                ));
            }

            self.nest(group);
        }
        Ok(self)
    }

    /// The attribute must reject each of the given values
    pub fn should_not_allow_values_for<V: Into<Value> + Clone>(
        &mut self,
        attribute: &str,
        values: &[V],
        options: MessageOptions,
    ) -> Result<&mut Self, ConfigError> {
        require_items(values, "should_not_allow_values_for")?;
        let message = options
            .message
            .unwrap_or_else(|| self.config.messages.invalid.as_str().into());

        for value in values {
            let value: Value = value.clone().into();
            let description = format!("doesn't allow {} to be set to {}", attribute, value);
            let cases = self.bad(attribute, value, &message);
            self.nest(Self::described(description, cases));
        }
        Ok(self)
    }

    /// The attribute must accept each of the given values without any error
    pub fn should_allow_values_for<V: Into<Value> + Clone>(
        &mut self,
        attribute: &str,
        values: &[V],
    ) -> Result<&mut Self, ConfigError> {
        require_items(values, "should_allow_values_for")?;

        for value in values {
            let value: Value = value.clone().into();
            let description = format!("allows {} to be set to {}", attribute, value);
            let cases = self.good(attribute, value, &ErrorMatcher::any());
            self.nest(Self::described(description, cases));
        }
        Ok(self)
    }

    /// The attribute's length must lie within `range`
    pub fn should_ensure_length_in_range(
        &mut self,
        attribute: &str,
        range: RangeInclusive<usize>,
        options: LengthRangeOptions,
    ) -> Result<&mut Self, ConfigError> {
        let (min, max) = range.into_inner();
        let probes = probe::length_range_probes(min, max, self.config.filler)?;
        let short = options
            .short_message
            .unwrap_or_else(|| self.config.messages.too_short(min).into());
        let long = options
            .long_message
            .unwrap_or_else(|| self.config.messages.too_long(max).into());

        if let Some(p) = &probes.too_short {
            let cases = self.probe_cases(attribute, p, &short);
            self.nest(Self::described(
                format!(
                    "does not allow {} to be less than {} chars long",
                    attribute, min
                ),
                cases,
            ));
        }
        if let Some(p) = &probes.at_min {
            let cases = self.probe_cases(attribute, p, &short);
            self.nest(Self::described(
                format!("allows {} to be exactly {} chars long", attribute, min),
                cases,
            ));
        }
        let cases = self.probe_cases(attribute, &probes.too_long, &long);
        self.nest(Self::described(
            format!(
                "does not allow {} to be more than {} chars long",
                attribute, max
            ),
            cases,
        ));
        if let Some(p) = &probes.at_max {
            let cases = self.probe_cases(attribute, p, &long);
            self.nest(Self::described(
                format!("allows {} to be exactly {} chars long", attribute, max),
                cases,
            ));
        }
        Ok(self)
    }

    /// The attribute must be at least `min` characters long
    pub fn should_ensure_length_at_least(
        &mut self,
        attribute: &str,
        min: usize,
        options: MinimumLengthOptions,
    ) -> Result<&mut Self, ConfigError> {
        let probes = probe::minimum_length_probes(min, self.config.filler);
        let short = options
            .short_message
            .unwrap_or_else(|| self.config.messages.too_short(min).into());

        if let Some(p) = &probes.too_short {
            let cases = self.probe_cases(attribute, p, &short);
            self.nest(Self::described(
                format!(
                    "does not allow {} to be less than {} chars long",
                    attribute, min
                ),
                cases,
            ));
        }
        let cases = self.probe_cases(attribute, &probes.at_min, &short);
        self.nest(Self::described(
            format!("allows {} to be at least {} chars long", attribute, min),
            cases,
        ));
        Ok(self)
    }

    /// The attribute must be exactly `length` characters long
    pub fn should_ensure_length_is(
        &mut self,
        attribute: &str,
        length: usize,
        options: MessageOptions,
    ) -> Result<&mut Self, ConfigError> {
        let probes = probe::exact_length_probes(length, self.config.filler)?;
        let message = options
            .message
            .unwrap_or_else(|| self.config.messages.wrong_length(length).into());

        let cases = self.probe_cases(attribute, &probes.too_short, &message);
        self.nest(Self::described(
            format!(
                "does not allow {} to be less than {} chars long",
                attribute, length
            ),
            cases,
        ));
        let cases = self.probe_cases(attribute, &probes.too_long, &message);
        self.nest(Self::described(
            format!(
                "does not allow {} to be greater than {} chars long",
                attribute, length
            ),
            cases,
        ));
        let cases = self.probe_cases(attribute, &probes.exact, &message);
        self.nest(Self::described(
            format!("allows {} to be {} chars long", attribute, length),
            cases,
        ));
        Ok(self)
    }

    fn value_range_groups<T: IntoValue + Clone + Display>(
        &mut self,
        attribute: &str,
        probes: probe::ValueRangeProbes<T>,
        options: ValueRangeOptions,
    ) -> &mut Self {
        let inclusion: ErrorMatcher = self.config.messages.inclusion.as_str().into();
        let low = options.low_message.unwrap_or_else(|| inclusion.clone());
        let high = options.high_message.unwrap_or(inclusion);
        let min = probes.at_min.value.clone();
        let max = probes.at_max.value.clone();

        let cases = self.probe_cases(attribute, &probes.below_min, &low);
        self.nest(Self::described(
            format!("does not allow {} to be less than {}", attribute, min),
            cases,
        ));
        let cases = self.probe_cases(attribute, &probes.at_min, &low);
        self.nest(Self::described(
            format!("allows {} to be {}", attribute, min),
            cases,
        ));
        let cases = self.probe_cases(attribute, &probes.above_max, &high);
        self.nest(Self::described(
            format!("does not allow {} to be more than {}", attribute, max),
            cases,
        ));
        let cases = self.probe_cases(attribute, &probes.at_max, &high);
        self.nest(Self::described(
            format!("allows {} to be {}", attribute, max),
            cases,
        ));
        self
    }

    /// The attribute must lie within an integer range
    ///
    /// Every probe must fit a [`Value::Int`]; an unsigned bound whose
    /// neighbour exceeds `i64::MAX` is rejected with
    /// [`ConfigError::UnrepresentableProbe`].
    pub fn should_ensure_value_in_range<T>(
        &mut self,
        attribute: &str,
        range: RangeInclusive<T>,
        options: ValueRangeOptions,
    ) -> Result<&mut Self, ConfigError>
    where
        T: PrimInt + Display + IntoValue,
    {
        let (min, max) = range.into_inner();
        let probes = probe::value_range_probes(min, max)?;
        if let Some(lossy) = probes.probes().into_iter().find(|p| p.value.to_i64().is_none()) {
            return Err(ConfigError::UnrepresentableProbe(lossy.value.to_string()));
        }
        Ok(self.value_range_groups(attribute, probes, options))
    }

    /// The attribute must lie within a range whose unit is `step`, e.g. a
    /// price between `0.01` and `99.99` stepping by `0.01`
    pub fn should_ensure_value_in_stepped_range<T>(
        &mut self,
        attribute: &str,
        range: RangeInclusive<T>,
        step: T,
        options: ValueRangeOptions,
    ) -> Result<&mut Self, ConfigError>
    where
        T: Num + PartialOrd + Copy + Display + IntoValue,
    {
        let (min, max) = range.into_inner();
        let probes = probe::stepped_value_range_probes(min, max, step)?;
        Ok(self.value_range_groups(attribute, probes, options))
    }

    /// Each attribute must reject non-numeric input
    ///
    /// The probe is assigned as text, so the attribute has to take raw input
    /// (a [`Value`] or `String` field) and validate it. A typed numeric field
    /// such as `score: i64` refuses the assignment itself, and every case
    /// fails with the [`AttributeError`](crate::AttributeError) instead.
    pub fn should_only_allow_numeric_values_for<S: AsRef<str>>(
        &mut self,
        attributes: &[S],
        options: MessageOptions,
    ) -> Result<&mut Self, ConfigError> {
        require_items(attributes, "should_only_allow_numeric_values_for")?;
        let message = options
            .message
            .unwrap_or_else(|| self.config.messages.not_a_number.as_str().into());
        let probe = probe::numeric_only_probe(&self.config.non_numeric_probe);

        for attribute in attributes {
            let attribute = attribute.as_ref();
            let cases = self.probe_cases(attribute, &probe, &message);
            self.nest(Self::described(
                format!("only allows numeric values for {}", attribute),
                cases,
            ));
        }
        Ok(self)
    }

    /// Each attribute must be accepted (set to `true`)
    pub fn should_require_acceptance_of<S: AsRef<str>>(
        &mut self,
        attributes: &[S],
        options: MessageOptions,
    ) -> Result<&mut Self, ConfigError> {
        require_items(attributes, "should_require_acceptance_of")?;
        let message = options
            .message
            .unwrap_or_else(|| self.config.messages.accepted.as_str().into());

        for attribute in attributes {
            let attribute = attribute.as_ref();
            let cases = self.bad(attribute, false, &message);
            self.nest(Self::described(
                format!("requires {} to be accepted", attribute),
                cases,
            ));
        }
        Ok(self)
    }

    /// The attribute must accept every value in `allowed` and reject every
    /// value in `disallowed`
    pub fn should_ensure_inclusion_of<V: Into<Value> + Clone>(
        &mut self,
        attribute: &str,
        allowed: &[V],
        disallowed: &[V],
        options: MessageOptions,
    ) -> Result<&mut Self, ConfigError> {
        if allowed.is_empty() && disallowed.is_empty() {
            return Err(ConfigError::EmptyDeclaration("should_ensure_inclusion_of"));
        }
        let message = options
            .message
            .unwrap_or_else(|| self.config.messages.inclusion.as_str().into());

        for value in allowed {
            let value: Value = value.clone().into();
            let description = format!("allows {} to be set to {}", attribute, value);
            let cases = self.good(attribute, value, &message);
            self.nest(Self::described(description, cases));
        }
        for value in disallowed {
            let value: Value = value.clone().into();
            let description = format!("doesn't allow {} to be set to {}", attribute, value);
            let cases = self.bad(attribute, value, &message);
            self.nest(Self::described(description, cases));
        }
        Ok(self)
    }

    /// The given instance must be valid as it stands
    pub fn should_be_valid(&mut self, instance: M) -> Result<&mut Self, ConfigError> {
        let case = assert_valid(&Subject::seeded(instance));
        Ok(self.nest(Self::described("is valid", vec![case])))
    }

    /// The given instance must save without errors
    pub fn should_save(&mut self, instance: M) -> Result<&mut Self, ConfigError> {
        let case = assert_save(&Subject::seeded(instance));
        Ok(self.nest(Self::described("saves", vec![case])))
    }

    // ------------------------------------------------------------------
    // Metadata declarations
    // ------------------------------------------------------------------

    fn relationship_case(name: &str, kind: RelationshipKind) -> (Option<Relationship>, TestCase) {
        let relationship = M::relationship(name);
        let actual = relationship.as_ref().map(|r| r.kind);
        let name = name.to_string();
        let case = TestCase::new("should have a relationship", Expectation::Holds, move || {
            match actual {
                None => Err(AssertionFailure::new(format!(
                    "{} has no relationship named {}",
                    M::type_name(),
                    name
                ))),
                Some(actual) => ensure(actual == kind, || {
                    format!("expected {} to be {}, got {}", name, kind, actual)
                }),
            }
        });
        (relationship, case)
    }

    fn column_case(
        &self,
        description: String,
        type_name: String,
        column: String,
    ) -> TestCase {
        let columns = self
            .catalog
            .table_for_type(&type_name)
            .map(|table| table.columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>());
        TestCase::new(description, Expectation::Holds, move || match &columns {
            None => Err(AssertionFailure::new(format!(
                "no table registered for {}",
                type_name
            ))),
            Some(columns) => ensure(columns.contains(&column), || {
                format!("{} has no {} column, got {:?}", type_name, column, columns)
            }),
        })
    }

    fn dependent_case(name: &str, relationship: &Relationship, expected: Dependent) -> TestCase {
        let actual = relationship.dependent;
        let name = name.to_string();
        TestCase::new(
            format!("should have {} be dependent on {}", name, expected),
            Expectation::Holds,
            move || {
                ensure(actual == Some(expected), || match actual {
                    Some(actual) => format!("{} is dependent on {}", name, actual),
                    None => format!("{} declares no dependent option", name),
                })
            },
        )
    }

    /// The model has a relationship of the given kind
    pub fn should_have_association(
        &mut self,
        name: &str,
        kind: RelationshipKind,
    ) -> Result<&mut Self, ConfigError> {
        let (_, case) = Self::relationship_case(name, kind);
        let mut group = ExampleGroup::new(format!("should have a {} association {}", kind, name));
        group.push(case);
        Ok(self.nest(group))
    }

    /// Each relationship is a `has_many`, with the foreign key present on
    /// the associated table
    pub fn should_have_many<S: AsRef<str>>(
        &mut self,
        names: &[S],
        options: HasManyOptions,
    ) -> Result<&mut Self, ConfigError> {
        require_items(names, "should_have_many")?;

        for name in names {
            let name = name.as_ref();
            let mut description = format!("has many {}", name);
            if let Some(through) = &options.through {
                description.push_str(&format!(" through {}", through));
            }
            if let Some(dependent) = options.dependent {
                description.push_str(&format!(" dependent {}", dependent));
            }
            let mut group = ExampleGroup::new(description);

            let (relationship, case) = Self::relationship_case(name, RelationshipKind::HasMany);
            group.push(case);
            let Some(relationship) = relationship else {
                self.nest(group);
                continue;
            };

            if let Some(through) = options.through.clone() {
                let exists = M::relationship(&through).is_some();
                let declared = relationship.through.clone();
                group.it(
                    format!("should have relationship to {}", through),
                    move || {
                        ensure(exists, || format!("no relationship named {}", through))?;
                        ensure(declared.as_deref() == Some(through.as_str()), || {
                            format!("relationship goes through {:?}", declared)
                        })
                    },
                );
            }

            if let Some(dependent) = options.dependent {
                group.push(Self::dependent_case(name, &relationship, dependent));
            }

            if relationship.through.is_none() {
                let fk = relationship
                    .foreign_key
                    .clone()
                    .or_else(|| relationship.interface.as_deref().map(foreign_key))
                    .unwrap_or_else(|| foreign_key(M::type_name()));
                let target = relationship.target_type();
                group.push(self.column_case(
                    format!("should have {} with {} as a foreign key", target, fk),
                    target,
                    fk,
                ));
            }

            self.nest(group);
        }
        Ok(self)
    }

    /// Each relationship is a `has_one`, with the foreign key present on the
    /// associated table
    pub fn should_have_one<S: AsRef<str>>(
        &mut self,
        names: &[S],
        options: HasOneOptions,
    ) -> Result<&mut Self, ConfigError> {
        require_items(names, "should_have_one")?;

        for name in names {
            let name = name.as_ref();
            let mut description = format!("has one {}", name);
            if let Some(dependent) = options.dependent {
                description.push_str(&format!(" dependent {}", dependent));
            }
            let mut group = ExampleGroup::new(description);

            let (relationship, case) = Self::relationship_case(name, RelationshipKind::HasOne);
            group.push(case);
            let Some(relationship) = relationship else {
                self.nest(group);
                continue;
            };

            let target = relationship.target_type();
            let fk = if let Some(fk) = &relationship.foreign_key {
                fk.clone()
            } else if let Some(interface) = &relationship.interface {
                let type_column = format!("{}_type", interface);
                group.push(self.column_case(
                    format!("{} should have a {} column", target, type_column),
                    target.clone(),
                    type_column,
                ));
                foreign_key(interface)
            } else {
                foreign_key(M::type_name())
            };

            group.push(self.column_case(
                format!("should have {} have a {} foreign key", target, fk),
                target,
                fk,
            ));

            if let Some(dependent) = options.dependent {
                group.push(Self::dependent_case(name, &relationship, dependent));
            }

            self.nest(group);
        }
        Ok(self)
    }

    /// Each relationship is a `has_and_belongs_to_many` whose join table exists
    pub fn should_have_and_belong_to_many<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<&mut Self, ConfigError> {
        require_items(names, "should_have_and_belong_to_many")?;

        for name in names {
            let name = name.as_ref();
            let mut group = ExampleGroup::new(format!("has and belongs to many {}", name));

            let (relationship, case) =
                Self::relationship_case(name, RelationshipKind::HasAndBelongsToMany);
            group.push(case);
            let Some(relationship) = relationship else {
                self.nest(group);
                continue;
            };

            let table = relationship.join_table.clone().unwrap_or_else(|| {
                let mut tables = [M::table_name(), tableize(&relationship.target_type())];
                tables.sort();
                tables.join("_")
            });
            let exists = self.catalog.has_table(&table);
            group.it(format!("should have table {} exist", table), move || {
                ensure(exists, || format!("table {} is not in the catalog", table))
            });

            self.nest(group);
        }
        Ok(self)
    }

    /// Each relationship is a `belongs_to` whose foreign key is on this
    /// model's table (unless polymorphic)
    pub fn should_belong_to<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<&mut Self, ConfigError> {
        require_items(names, "should_belong_to")?;

        for name in names {
            let name = name.as_ref();
            let mut group = ExampleGroup::new(format!("belongs to {}", name));

            let (relationship, case) = Self::relationship_case(name, RelationshipKind::BelongsTo);
            group.push(case);
            let Some(relationship) = relationship else {
                self.nest(group);
                continue;
            };

            if !relationship.polymorphic {
                let fk = relationship
                    .foreign_key
                    .clone()
                    .unwrap_or_else(|| foreign_key(name));
                group.push(self.column_case(
                    format!("should have a {} foreign key", fk),
                    M::type_name().to_string(),
                    fk,
                ));
            }

            self.nest(group);
        }
        Ok(self)
    }

    /// Each attribute is excluded from mass assignment
    pub fn should_protect_attributes<S: AsRef<str>>(
        &mut self,
        attributes: &[S],
    ) -> Result<&mut Self, ConfigError> {
        require_items(attributes, "should_protect_attributes")?;
        let protected = M::protected_attributes();
        let accessible = M::accessible_attributes();

        for attribute in attributes {
            let attribute = attribute.as_ref().to_string();
            let is_protected = protected.contains(&attribute.as_str())
                || (!accessible.is_empty() && !accessible.contains(&attribute.as_str()));
            let mut group =
                ExampleGroup::new(format!("protects {} from mass updates", attribute));
            group.it("should be protected", move || {
                ensure(is_protected, || {
                    format!("{} can be mass assigned", attribute)
                })
            });
            self.nest(group);
        }
        Ok(self)
    }

    /// Each attribute cannot change once the record exists
    pub fn should_have_readonly_attributes<S: AsRef<str>>(
        &mut self,
        attributes: &[S],
    ) -> Result<&mut Self, ConfigError> {
        require_items(attributes, "should_have_readonly_attributes")?;
        let readonly = M::readonly_attributes();

        for attribute in attributes {
            let attribute = attribute.as_ref().to_string();
            let is_readonly = readonly.contains(&attribute.as_str());
            let mut group = ExampleGroup::new(format!("makes {} read-only", attribute));
            group.it("should be read-only", move || {
                ensure(is_readonly, || format!("{} is writable", attribute))
            });
            self.nest(group);
        }
        Ok(self)
    }

    /// The model type exposes each class method
    pub fn should_have_class_methods<S: AsRef<str>>(
        &mut self,
        methods: &[S],
    ) -> Result<&mut Self, ConfigError> {
        require_items(methods, "should_have_class_methods")?;
        let declared = M::class_methods();

        for method in methods {
            let method = method.as_ref().to_string();
            let responds = declared.contains(&method.as_str());
            let mut group =
                ExampleGroup::new(format!("responds to class method #{}", method));
            group.it("should respond", move || {
                ensure(responds, || {
                    format!("{} does not respond to {}", M::type_name(), method)
                })
            });
            self.nest(group);
        }
        Ok(self)
    }

    /// Instances expose each method; attribute readers and `name=` writers
    /// count as methods
    pub fn should_have_instance_methods<S: AsRef<str>>(
        &mut self,
        methods: &[S],
    ) -> Result<&mut Self, ConfigError> {
        require_items(methods, "should_have_instance_methods")?;
        let declared = M::instance_methods();
        let instance = M::default();

        for method in methods {
            let method = method.as_ref().to_string();
            let attribute = method.strip_suffix('=').unwrap_or(&method);
            let responds = declared.contains(&method.as_str()) || instance.responds_to(attribute);
            let mut group =
                ExampleGroup::new(format!("responds to instance method #{}", method));
            group.it("should respond", move || {
                ensure(responds, || {
                    format!("{} instances do not respond to {}", M::type_name(), method)
                })
            });
            self.nest(group);
        }
        Ok(self)
    }

    /// Each column exists on the backing table, with the given type if any
    pub fn should_have_db_columns<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        options: ColumnsOptions,
    ) -> Result<&mut Self, ConfigError> {
        require_items(columns, "should_have_db_columns")?;

        for name in columns {
            let name = name.as_ref().to_string();
            let mut description = format!("has column {}", name);
            if let Some(sql_type) = &options.sql_type {
                description.push_str(&format!(" of type {}", sql_type));
            }
            let column = M::column(&name);
            let sql_type = options.sql_type.clone();
            let mut group = ExampleGroup::new(description);
            group.it("should have column", move || {
                let Some(column) = &column else {
                    return Err(AssertionFailure::new(format!(
                        "{} has no column {}",
                        M::table_name(),
                        name
                    )));
                };
                match &sql_type {
                    Some(expected) => ensure(column.sql_type == *expected, || {
                        format!("column {} has type {}", name, column.sql_type)
                    }),
                    None => Ok(()),
                }
            });
            self.nest(group);
        }
        Ok(self)
    }

    /// The column exists and matches every given option
    pub fn should_have_db_column(
        &mut self,
        name: &str,
        options: ColumnOptions,
    ) -> Result<&mut Self, ConfigError> {
        let mut description = format!("has column named {}", name);
        let described = options.describe();
        if !options.is_empty() {
            let rendered: Vec<String> = described
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect();
            description.push_str(&format!(" with options {{{}}}", rendered.join(", ")));
        }

        let column = M::column(name);
        let mut group = ExampleGroup::new(description);
        {
            let exists = column.is_some();
            let name = name.to_string();
            group.it("should have column", move || {
                ensure(exists, || {
                    format!("{} has no column {}", M::table_name(), name)
                })
            });
        }

        for (key, expected) in described {
            let actual = column.as_ref().map(|c| match key {
                "sql_type" => c.sql_type.clone(),
                "default" => format!("{:?}", c.default),
                "null" => c.nullable.to_string(),
                "limit" => c.limit.map(|l| l.to_string()).unwrap_or_default(),
                "precision" => c.precision.map(|p| p.to_string()).unwrap_or_default(),
                "scale" => c.scale.map(|s| s.to_string()).unwrap_or_default(),
                _ => c.primary.to_string(),
            });
            group.it(
                format!(
                    "should have {} column on table for {} match option {}",
                    name,
                    M::type_name(),
                    key
                ),
                move || match &actual {
                    None => Err(AssertionFailure::new("column is missing")),
                    Some(actual) => ensure(*actual == expected, || {
                        format!("expected {} to be {}, got {}", key, expected, actual)
                    }),
                },
            );
        }

        Ok(self.nest(group))
    }

    /// The backing table has an index on each column tuple
    pub fn should_have_indices<S: AsRef<str>>(
        &mut self,
        indices: &[&[S]],
    ) -> Result<&mut Self, ConfigError> {
        require_items(indices, "should_have_indices")?;
        let table = M::table_name();
        let existing: Vec<Vec<String>> = M::indexes().into_iter().map(|i| i.columns).collect();

        for columns in indices {
            let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
            let found = existing.contains(&columns);
            let mut group =
                ExampleGroup::new(format!("has index on {} for {:?}", table, columns));
            let known = existing.clone();
            group.it("should have index", move || {
                ensure(found, || {
                    format!("no index on {:?}, indexes are {:?}", columns, known)
                })
            });
            self.nest(group);
        }
        Ok(self)
    }

    /// Alias of [`ModelGroup::should_have_indices`] for a single index
    pub fn should_have_index<S: AsRef<str>>(
        &mut self,
        columns: &[S],
    ) -> Result<&mut Self, ConfigError> {
        self.should_have_indices(&[columns])
    }
}
