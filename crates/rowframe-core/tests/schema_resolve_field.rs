use pretty_assertions::assert_eq;
use rowframe_core::schema::*;
use rowframe_core::stmt::{Path, Type};

const COUNTRY: ModelId = ModelId(0);
const AUTHOR: ModelId = ModelId(1);
const BOOK: ModelId = ModelId(2);
const PROFILE: ModelId = ModelId(3);
const TAG: ModelId = ModelId(4);

/// Schema:
///   Country { id, name, authors: HasMany<Author> }
///   Author  { id, name, country: BelongsTo<Country> }
///   Book    { id, title, author: BelongsTo<Author>, editor: BelongsTo<Author> as "edited_books", tags: ManyToMany<Tag> }
///   Profile { id, author: OneToOne<Author>, bio }
///   Tag     { id, label }
fn schema() -> Schema {
    let mut builder = Schema::builder();

    builder.model(
        Model::builder("Country")
            .primary_key("id", Type::I64)
            .field("name", Type::String)
            .has_many("authors", AUTHOR, "country"),
    );
    builder.model(
        Model::builder("Author")
            .primary_key("id", Type::I64)
            .field("name", Type::String)
            .belongs_to("country", COUNTRY)
            .nullable(),
    );
    builder.model(
        Model::builder("Book")
            .primary_key("id", Type::I64)
            .field("title", Type::String)
            .belongs_to("author", AUTHOR)
            .belongs_to("editor", AUTHOR)
            .related_name("edited_books")
            .nullable()
            .many_to_many("tags", TAG),
    );
    builder.model(
        Model::builder("Profile")
            .primary_key("id", Type::I64)
            .one_to_one("author", AUTHOR)
            .field("bio", Type::String),
    );
    builder.model(
        Model::builder("Tag")
            .primary_key("id", Type::I64)
            .field("label", Type::String),
    );

    builder.build().unwrap()
}

#[test]
fn scalar_field_resolves_to_itself() {
    let schema = schema();
    let resolved = schema.resolve_field(BOOK, "title").unwrap();

    assert_eq!(resolved.field.id, BOOK.field(1));
    assert_eq!(resolved.kind, FieldKind::Scalar);
    assert_eq!(resolved.path, Path::field(BOOK.field(1)));
    assert_eq!(resolved.target(), None);
}

#[test]
fn to_one_hop_rebinds_model() {
    let schema = schema();
    let resolved = schema.resolve_field(BOOK, "author__name").unwrap();

    assert_eq!(resolved.field.id, AUTHOR.field(1));
    assert_eq!(resolved.kind, FieldKind::Scalar);
    assert_eq!(resolved.path.steps, vec![BOOK.field(2), AUTHOR.field(1)]);
}

#[test]
fn multi_hop_path() {
    let schema = schema();
    let resolved = schema.resolve_field(BOOK, "author__country__name").unwrap();

    assert_eq!(resolved.field.id, COUNTRY.field(1));
    assert_eq!(
        resolved.path.steps,
        vec![BOOK.field(2), AUTHOR.field(2), COUNTRY.field(1)]
    );
}

#[test]
fn terminal_relation_kinds() {
    let schema = schema();

    let author = schema.resolve_field(BOOK, "author").unwrap();
    assert_eq!(author.kind, FieldKind::ToOne);
    assert_eq!(author.target(), Some(AUTHOR));

    let tags = schema.resolve_field(BOOK, "tags").unwrap();
    assert_eq!(tags.kind, FieldKind::ToMany);
    assert_eq!(tags.target(), Some(TAG));

    let authors = schema.resolve_field(COUNTRY, "authors").unwrap();
    assert_eq!(authors.kind, FieldKind::ReverseToMany);
    assert_eq!(authors.target(), Some(AUTHOR));
}

#[test]
fn many_to_many_hop() {
    let schema = schema();
    let resolved = schema.resolve_field(BOOK, "tags__label").unwrap();

    assert_eq!(resolved.field.id, TAG.field(1));
}

#[test]
fn default_reverse_accessor() {
    let schema = schema();

    let title = schema.resolve_field(AUTHOR, "book_set__title").unwrap();
    assert_eq!(title.field.id, BOOK.field(1));
    assert_eq!(title.path.steps, vec![BOOK.field(2), BOOK.field(1)]);

    let books = schema.resolve_field(AUTHOR, "book_set").unwrap();
    assert_eq!(books.field.id, BOOK.field(2));
    assert_eq!(books.kind, FieldKind::ReverseToMany);
    assert_eq!(books.target(), Some(BOOK));
}

#[test]
fn named_reverse_accessor() {
    let schema = schema();
    let resolved = schema.resolve_field(AUTHOR, "edited_books").unwrap();

    assert_eq!(resolved.field.id, BOOK.field(3));
    assert_eq!(resolved.kind, FieldKind::ReverseToMany);
}

#[test]
fn reverse_one_to_one_accessor() {
    let schema = schema();

    let profile = schema.resolve_field(AUTHOR, "profile").unwrap();
    assert_eq!(profile.kind, FieldKind::ReverseToOne);

    let bio = schema.resolve_field(AUTHOR, "profile__bio").unwrap();
    assert_eq!(bio.field.id, PROFILE.field(2));
}

#[test]
fn declared_has_many_hop() {
    let schema = schema();
    let resolved = schema.resolve_field(COUNTRY, "authors__name").unwrap();

    assert_eq!(resolved.field.id, AUTHOR.field(1));
    assert_eq!(resolved.path.steps, vec![COUNTRY.field(2), AUTHOR.field(1)]);
}

#[test]
fn reverse_many_to_many_accessor() {
    let schema = schema();
    let resolved = schema.resolve_field(TAG, "book_set__title").unwrap();

    assert_eq!(resolved.field.id, BOOK.field(1));
    assert_eq!(resolved.path.steps, vec![BOOK.field(4), BOOK.field(1)]);
}

#[test]
fn unknown_first_segment_fails() {
    let schema = schema();
    let err = schema.resolve_field(BOOK, "publisher__name").unwrap_err();

    assert!(err.is_field_not_found());
    assert_eq!(
        err.to_string(),
        "field not found: `Book` has no field or reverse relation `publisher` (resolving `publisher__name`)"
    );
}

#[test]
fn unknown_later_segment_fails() {
    let schema = schema();
    let err = schema.resolve_field(BOOK, "author__nickname").unwrap_err();

    assert!(err.is_field_not_found());
    assert!(err.to_string().contains("`Author`"));
}

#[test]
fn segment_after_scalar_fails() {
    let schema = schema();
    let err = schema.resolve_field(BOOK, "title__length").unwrap_err();

    assert!(err.is_field_not_found());
}

#[test]
fn empty_path_fails() {
    let schema = schema();

    assert!(schema.resolve_field(BOOK, "").unwrap_err().is_field_not_found());
    assert!(schema
        .resolve_field(BOOK, "author____name")
        .unwrap_err()
        .is_field_not_found());
}

#[test]
fn resolve_fields_keeps_order_and_reports_each() {
    let schema = schema();
    let results: Vec<_> = schema
        .resolve_fields(BOOK, ["title", "nope", "author"])
        .collect();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().field.id, BOOK.field(1));
    assert!(results[1].as_ref().unwrap_err().is_field_not_found());
    assert_eq!(results[2].as_ref().unwrap().field.id, BOOK.field(2));
}

#[test]
fn path_display_round_trips() {
    let schema = schema();

    for (root, name) in [
        (BOOK, "author__country__name"),
        (BOOK, "tags__label"),
        (AUTHOR, "book_set__title"),
        (AUTHOR, "edited_books"),
        (AUTHOR, "profile__bio"),
        (COUNTRY, "authors__name"),
        (TAG, "book_set"),
    ] {
        let resolved = schema.resolve_field(root, name).unwrap();
        assert_eq!(resolved.path.display(&schema), name);
    }
}
