//! Integration tests for relationship, column and index declarations

use vouch::declare::{ColumnOptions, ColumnsOptions, HasManyOptions, HasOneOptions};
use vouch::{
    Attributes, Catalog, Column, Dependent, Index, Model, ModelGroup, OutputFormat, Relationship,
    RelationshipKind, RunConfig, Table, Validate, ValidationErrors,
};

#[derive(Debug, Clone, Default, Attributes)]
struct Author {
    name: String,
    email: String,
    account_id: Option<i64>,
}

impl Validate for Author {
    fn validate(&self) -> ValidationErrors {
        ValidationErrors::new()
    }
}

impl Model for Author {
    fn type_name() -> &'static str {
        "Author"
    }

    fn relationships() -> Vec<Relationship> {
        vec![
            Relationship::belongs_to("account"),
            Relationship::belongs_to("owner").polymorphic(),
            Relationship::has_many("posts").dependent(Dependent::Destroy),
            Relationship::has_many("comments").through("posts"),
            Relationship::has_many("pictures").as_interface("imageable"),
            Relationship::has_one("profile").dependent(Dependent::Nullify),
            Relationship::has_one("avatar").as_interface("attachable"),
            Relationship::has_one("biography").dependent(Dependent::Delete),
            Relationship::has_and_belongs_to_many("groups"),
            Relationship::has_and_belongs_to_many("tags").join_table("taggings"),
        ]
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "integer").not_null().primary(),
            Column::new("name", "varchar(255)").not_null().limit(255),
            Column::new("email", "varchar(255)").limit(255),
            Column::new("account_id", "integer"),
            Column::new("rating", "decimal").precision(5).scale(2).default_value("0.0"),
        ]
    }

    fn indexes() -> Vec<Index> {
        vec![
            Index::on(&["email"]).unique(),
            Index::on(&["account_id", "email"]),
        ]
    }

    fn protected_attributes() -> Vec<&'static str> {
        vec!["account_id"]
    }

    fn readonly_attributes() -> Vec<&'static str> {
        vec!["email"]
    }

    fn class_methods() -> Vec<&'static str> {
        vec!["find_by_email"]
    }

    fn instance_methods() -> Vec<&'static str> {
        vec!["display_name"]
    }
}

fn catalog() -> Catalog {
    Catalog::new()
        .with_table(Table::new("posts").column(Column::new("author_id", "integer")))
        .with_table(Table::new("pictures").column(Column::new("imageable_id", "integer")))
        .with_table(Table::new("profiles").column(Column::new("author_id", "integer")))
        .with_table(Table::new("biographies").column(Column::new("author_id", "integer")))
        .with_table(
            Table::new("avatars")
                .column(Column::new("attachable_id", "integer"))
                .column(Column::new("attachable_type", "varchar(255)")),
        )
        .with_table(Table::new("authors_groups"))
        .with_table(Table::new("taggings"))
}

fn authors() -> ModelGroup<Author> {
    ModelGroup::<Author>::default().with_catalog(catalog())
}

fn quiet() -> RunConfig {
    RunConfig::default().with_format(OutputFormat::Quiet)
}

#[test]
fn test_relationship_declarations_pass() {
    let mut group = authors();
    group
        .should_belong_to(&["account", "owner"])
        .unwrap()
        .should_have_many(
            &["posts"],
            HasManyOptions {
                dependent: Some(Dependent::Destroy),
                ..HasManyOptions::default()
            },
        )
        .unwrap()
        .should_have_many(
            &["comments"],
            HasManyOptions {
                through: Some("posts".to_string()),
                ..HasManyOptions::default()
            },
        )
        .unwrap()
        .should_have_many(&["pictures"], HasManyOptions::default())
        .unwrap()
        .should_have_one(
            &["profile"],
            HasOneOptions {
                dependent: Some(Dependent::Nullify),
            },
        )
        .unwrap()
        .should_have_one(&["avatar"], HasOneOptions::default())
        .unwrap()
        .should_have_and_belong_to_many(&["groups", "tags"])
        .unwrap()
        .should_have_association("posts", RelationshipKind::HasMany)
        .unwrap();

    let report = group.run(&quiet());
    report.assert_passed();
    assert_eq!(
        group.group().descriptions(),
        vec![
            "Author belongs to account should have a relationship",
            "Author belongs to account should have a account_id foreign key",
            "Author belongs to owner should have a relationship",
            "Author has many posts dependent destroy should have a relationship",
            "Author has many posts dependent destroy should have posts be dependent on destroy",
            "Author has many posts dependent destroy should have Post with author_id as a foreign key",
            "Author has many comments through posts should have a relationship",
            "Author has many comments through posts should have relationship to posts",
            "Author has many pictures should have a relationship",
            "Author has many pictures should have Picture with imageable_id as a foreign key",
            "Author has one profile dependent nullify should have a relationship",
            "Author has one profile dependent nullify should have Profile have a author_id foreign key",
            "Author has one profile dependent nullify should have profile be dependent on nullify",
            "Author has one avatar should have a relationship",
            "Author has one avatar Avatar should have a attachable_type column",
            "Author has one avatar should have Avatar have a attachable_id foreign key",
            "Author has and belongs to many groups should have a relationship",
            "Author has and belongs to many groups should have table authors_groups exist",
            "Author has and belongs to many tags should have a relationship",
            "Author has and belongs to many tags should have table taggings exist",
            "Author should have a has_many association posts should have a relationship",
        ]
    );
}

#[test]
fn test_has_one_delete_dependency() {
    let mut group = authors();
    group
        .should_have_one(
            &["biography"],
            HasOneOptions {
                dependent: Some(Dependent::Delete),
            },
        )
        .unwrap();

    group.run(&quiet()).assert_passed();
    assert_eq!(
        group.group().descriptions(),
        vec![
            "Author has one biography dependent delete should have a relationship",
            "Author has one biography dependent delete should have Biography have a author_id foreign key",
            "Author has one biography dependent delete should have biography be dependent on delete",
        ]
    );
}

#[test]
fn test_missing_relationship_short_circuits() {
    let mut group = authors();
    group
        .should_have_many(
            &["reviews"],
            HasManyOptions {
                dependent: Some(Dependent::Destroy),
                ..HasManyOptions::default()
            },
        )
        .unwrap();

    let report = group.run(&quiet());
    assert_eq!(report.reports.len(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        report.reports[0].description,
        "Author has many reviews dependent destroy should have a relationship"
    );
}

#[test]
fn test_wrong_kind_and_options_fail() {
    let mut group = authors();
    group
        .should_have_one(&["posts"], HasOneOptions::default())
        .unwrap()
        .should_have_many(
            &["posts"],
            HasManyOptions {
                dependent: Some(Dependent::Nullify),
                ..HasManyOptions::default()
            },
        )
        .unwrap();

    let report = group.run(&quiet());
    let failed: Vec<&str> = report.failures().map(|r| r.description.as_str()).collect();
    assert_eq!(
        failed,
        vec![
            "Author has one posts should have a relationship",
            "Author has many posts dependent nullify should have posts be dependent on nullify",
        ]
    );
}

#[test]
fn test_missing_join_table_fails() {
    let mut group = ModelGroup::<Author>::default();
    group.should_have_and_belong_to_many(&["groups"]).unwrap();
    let report = group.run(&quiet());
    assert_eq!(report.passed(), 1);
    assert_eq!(report.failed(), 1);
}

#[test]
fn test_attribute_metadata() {
    let mut group = authors();
    group
        .should_protect_attributes(&["account_id"])
        .unwrap()
        .should_have_readonly_attributes(&["email"])
        .unwrap()
        .should_have_class_methods(&["find_by_email"])
        .unwrap()
        .should_have_instance_methods(&["display_name", "name", "email="])
        .unwrap();
    group.run(&quiet()).assert_passed();

    let mut group = authors();
    group
        .should_protect_attributes(&["name"])
        .unwrap()
        .should_have_readonly_attributes(&["name"])
        .unwrap()
        .should_have_class_methods(&["destroy_all"])
        .unwrap()
        .should_have_instance_methods(&["nickname"])
        .unwrap();
    let report = group.run(&quiet());
    assert_eq!(report.failed(), 4);
    assert_eq!(
        group.group().descriptions(),
        vec![
            "Author protects name from mass updates should be protected",
            "Author makes name read-only should be read-only",
            "Author responds to class method #destroy_all should respond",
            "Author responds to instance method #nickname should respond",
        ]
    );
}

#[test]
fn test_column_declarations() {
    let mut group = authors();
    group
        .should_have_db_columns(&["name", "email"], ColumnsOptions::default())
        .unwrap()
        .should_have_db_columns(
            &["account_id"],
            ColumnsOptions {
                sql_type: Some("integer".to_string()),
            },
        )
        .unwrap()
        .should_have_db_column(
            "name",
            ColumnOptions {
                sql_type: Some("varchar(255)".to_string()),
                nullable: Some(false),
                limit: Some(255),
                ..ColumnOptions::default()
            },
        )
        .unwrap()
        .should_have_db_column(
            "rating",
            ColumnOptions {
                default: Some(Some("0.0".to_string())),
                precision: Some(5),
                scale: Some(2),
                ..ColumnOptions::default()
            },
        )
        .unwrap()
        .should_have_db_column(
            "email",
            ColumnOptions {
                default: Some(None),
                ..ColumnOptions::default()
            },
        )
        .unwrap();

    let report = group.run(&quiet());
    report.assert_passed();

    let descriptions = group.group().descriptions();
    assert!(descriptions.contains(&"Author has column account_id of type integer should have column".to_string()));
    assert!(descriptions.contains(
        &"Author has column named name with options {sql_type: varchar(255), null: false, limit: 255} should have name column on table for Author match option limit"
            .to_string()
    ));
}

#[test]
fn test_column_mismatches_fail() {
    let mut group = authors();
    group
        .should_have_db_columns(
            &["name"],
            ColumnsOptions {
                sql_type: Some("text".to_string()),
            },
        )
        .unwrap()
        .should_have_db_column("missing", ColumnOptions::default())
        .unwrap()
        .should_have_db_column(
            "email",
            ColumnOptions {
                nullable: Some(false),
                ..ColumnOptions::default()
            },
        )
        .unwrap();

    let report = group.run(&quiet());
    assert_eq!(report.reports.len(), 4);
    assert_eq!(report.failed(), 3);
}

#[test]
fn test_index_declarations() {
    let mut group = authors();
    group
        .should_have_indices(&[&["email"][..], &["account_id", "email"][..]])
        .unwrap()
        .should_have_index(&["name"])
        .unwrap();

    let report = group.run(&quiet());
    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        report.reports[2].description,
        "Author has index on authors for [\"name\"] should have index"
    );
}
