//! Model metadata: relationships, backing columns, indexes and the schema
//! catalog that lets a declaration inspect the other side of a relationship.
//!
//! Nothing here is discovered at runtime. Each model type describes itself
//! through the [`Model`] trait.

use std::collections::BTreeMap;
use std::fmt;

use crate::entity::{Entity, ValidationErrors};

/// The kind of a declared relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasAndBelongsToMany,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipKind::BelongsTo => "belongs_to",
            RelationshipKind::HasOne => "has_one",
            RelationshipKind::HasMany => "has_many",
            RelationshipKind::HasAndBelongsToMany => "has_and_belongs_to_many",
        };
        write!(f, "{}", name)
    }
}

/// What happens to associated records when the owner is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependent {
    Destroy,
    /// `has_one` deletion without callbacks
    Delete,
    /// `has_many` deletion without callbacks
    DeleteAll,
    Nullify,
}

impl fmt::Display for Dependent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dependent::Destroy => "destroy",
            Dependent::Delete => "delete",
            Dependent::DeleteAll => "delete_all",
            Dependent::Nullify => "nullify",
        };
        write!(f, "{}", name)
    }
}

/// A declared relationship between two model types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub name: String,
    pub kind: RelationshipKind,
    pub class_name: Option<String>,
    pub foreign_key: Option<String>,
    pub through: Option<String>,
    pub dependent: Option<Dependent>,
    /// Polymorphic interface name on the other side (`as`)
    pub interface: Option<String>,
    /// This side is a polymorphic `belongs_to`
    pub polymorphic: bool,
    pub join_table: Option<String>,
}

impl Relationship {
    fn new(name: impl Into<String>, kind: RelationshipKind) -> Self {
        Self {
            name: name.into(),
            kind,
            class_name: None,
            foreign_key: None,
            through: None,
            dependent: None,
            interface: None,
            polymorphic: false,
            join_table: None,
        }
    }

    pub fn belongs_to(name: impl Into<String>) -> Self {
        Self::new(name, RelationshipKind::BelongsTo)
    }

    pub fn has_one(name: impl Into<String>) -> Self {
        Self::new(name, RelationshipKind::HasOne)
    }

    pub fn has_many(name: impl Into<String>) -> Self {
        Self::new(name, RelationshipKind::HasMany)
    }

    pub fn has_and_belongs_to_many(name: impl Into<String>) -> Self {
        Self::new(name, RelationshipKind::HasAndBelongsToMany)
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn through(mut self, through: impl Into<String>) -> Self {
        self.through = Some(through.into());
        self
    }

    pub fn dependent(mut self, dependent: Dependent) -> Self {
        self.dependent = Some(dependent);
        self
    }

    /// Declare the polymorphic interface the other side belongs to
    pub fn as_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    pub fn join_table(mut self, table: impl Into<String>) -> Self {
        self.join_table = Some(table.into());
        self
    }

    /// Type name of the associated model
    pub fn target_type(&self) -> String {
        match &self.class_name {
            Some(name) => name.clone(),
            None => match self.kind {
                RelationshipKind::HasMany | RelationshipKind::HasAndBelongsToMany => {
                    classify(&self.name)
                }
                RelationshipKind::BelongsTo | RelationshipKind::HasOne => camelize(&self.name),
            },
        }
    }
}

/// A column on a model's backing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub limit: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub primary: bool,
}

impl Column {
    /// A nullable column without default
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: true,
            default: None,
            limit: None,
            precision: None,
            scale: None,
            primary: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.nullable = false;
        self
    }
}

/// An index over one or more columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Index {
    pub fn on<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Self-description of a persisted model type
///
/// Only [`Model::type_name`] is required; everything else defaults to
/// "nothing declared".
pub trait Model: Entity {
    /// The model's type name, e.g. `"UserProfile"`
    fn type_name() -> &'static str;

    /// Name of the backing table
    fn table_name() -> String {
        tableize(Self::type_name())
    }

    fn relationships() -> Vec<Relationship> {
        Vec::new()
    }

    fn columns() -> Vec<Column> {
        Vec::new()
    }

    fn indexes() -> Vec<Index> {
        Vec::new()
    }

    /// Attributes excluded from mass assignment
    fn protected_attributes() -> Vec<&'static str> {
        Vec::new()
    }

    /// Attributes allowed in mass assignment; empty means "all"
    fn accessible_attributes() -> Vec<&'static str> {
        Vec::new()
    }

    /// Attributes that cannot change once the record exists
    fn readonly_attributes() -> Vec<&'static str> {
        Vec::new()
    }

    fn class_methods() -> Vec<&'static str> {
        Vec::new()
    }

    /// Instance methods beyond the attribute readers and writers
    fn instance_methods() -> Vec<&'static str> {
        Vec::new()
    }

    /// An existing persisted record, used as the seed for uniqueness checks
    fn first_record() -> Option<Self> {
        None
    }

    /// Persist the record, returning the errors that stopped it
    ///
    /// The default only validates. Models backed by storage override it.
    fn save(&mut self) -> Result<(), ValidationErrors> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn relationship(name: &str) -> Option<Relationship> {
        Self::relationships().into_iter().find(|r| r.name == name)
    }

    fn column(name: &str) -> Option<Column> {
        Self::columns().into_iter().find(|c| c.name == name)
    }

    fn column_names() -> Vec<String> {
        Self::columns().into_iter().map(|c| c.name).collect()
    }
}

/// A table known to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

/// The schema as far as declarations are concerned: tables by name and the
/// table behind each registered model type
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: BTreeMap<String, Table>,
    types: BTreeMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model type and its backing table
    pub fn register<M: Model>(mut self) -> Self {
        let table = Table {
            name: M::table_name(),
            columns: M::columns(),
            indexes: M::indexes(),
        };
        self.types
            .insert(M::type_name().to_string(), table.name.clone());
        self.tables.insert(table.name.clone(), table);
        self
    }

    /// Add a table with no model type, e.g. a join table
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// The table behind a model type name, falling back to the conventional
    /// table name when the type was not registered
    pub fn table_for_type(&self, type_name: &str) -> Option<&Table> {
        let name = self
            .types
            .get(type_name)
            .cloned()
            .unwrap_or_else(|| tableize(type_name));
        self.tables.get(&name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// `UserProfile` → `user_profile`
pub fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

/// `user_profile` → `UserProfile`
pub fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// English plural of a lowercase word, good enough for table names
pub fn pluralize(word: &str) -> String {
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(|c| !is_vowel(c))
    {
        return format!("{}ies", stem);
    }
    format!("{}s", word)
}

/// Inverse of [`pluralize`]
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    for suffix in ["ses", "xes", "zes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.ends_with('s') => stem.to_string(),
        _ => word.to_string(),
    }
}

/// `UserProfile` → `user_profiles`
pub fn tableize(type_name: &str) -> String {
    pluralize(&underscore(type_name))
}

/// `comments` → `Comment`
pub fn classify(name: &str) -> String {
    camelize(&singularize(name))
}

/// `UserProfile` → `user_profile_id`
pub fn foreign_key(name: &str) -> String {
    format!("{}_id", underscore(name))
}
