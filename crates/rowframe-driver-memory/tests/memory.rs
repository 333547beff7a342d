use pretty_assertions::assert_eq;
use rowframe_core::{
    driver::{operation::Labels, Driver, Operation},
    schema::{Model, ModelId},
    stmt::{Direction, Expr, Query, Type, Value, ValueRecord},
    Schema,
};
use rowframe_driver_memory::Memory;
use std::sync::Arc;

const AUTHOR: ModelId = ModelId(0);
const BOOK: ModelId = ModelId(1);
const TAG: ModelId = ModelId(2);

fn schema() -> Arc<Schema> {
    let mut builder = Schema::builder();
    builder.model(
        Model::builder("Author")
            .primary_key("id", Type::I64)
            .field("name", Type::String),
    );
    builder.model(
        Model::builder("Book")
            .primary_key("id", Type::I64)
            .field("title", Type::String)
            .belongs_to("author", AUTHOR)
            .nullable()
            .many_to_many("tags", TAG),
    );
    builder.model(
        Model::builder("Tag")
            .primary_key("id", Type::I64)
            .field("label", Type::String),
    );
    Arc::new(builder.build().unwrap())
}

fn seed(schema: &Arc<Schema>) -> Memory {
    let driver = Memory::new(schema.clone()).with_label(AUTHOR, |record| {
        record[1].as_str().unwrap_or_default().to_string()
    });

    for (id, name) in [(1, "Alice"), (2, "Bob")] {
        driver
            .insert(AUTHOR, [("id", Value::from(id)), ("name", Value::from(name))])
            .unwrap();
    }

    for (id, label) in [(1, "fiction"), (2, "classic")] {
        driver
            .insert(TAG, [("id", Value::from(id)), ("label", Value::from(label))])
            .unwrap();
    }

    for (id, title, author, tags) in [
        (3, "Emma", Value::from(1), vec![1_i64, 2]),
        (1, "Persuasion", Value::from(1), vec![]),
        (2, "Anonymous", Value::Null, vec![2]),
    ] {
        driver
            .insert(
                BOOK,
                [
                    ("id", Value::from(id)),
                    ("title", Value::from(title)),
                    ("author", author),
                    (
                        "tags",
                        Value::List(tags.into_iter().map(Value::from).collect()),
                    ),
                ],
            )
            .unwrap();
    }

    driver
}

async fn run(driver: &Memory, schema: &Arc<Schema>, query: Query) -> Vec<Vec<Value>> {
    driver
        .exec(schema, Operation::Query(query))
        .await
        .unwrap()
        .into_rows()
        .into_iter()
        .map(ValueRecord::into_vec)
        .collect()
}

fn path(schema: &Schema, root: ModelId, name: &str) -> rowframe_core::stmt::Path {
    schema.resolve_field(root, name).unwrap().path
}

#[tokio::test]
async fn whole_records_in_insertion_order() {
    let schema = schema();
    let driver = seed(&schema);

    let rows = run(&driver, &schema, Query::all(BOOK)).await;

    assert_eq!(
        rows,
        vec![
            vec![Value::from(3), Value::from("Emma"), Value::from(1)],
            vec![Value::from(1), Value::from("Persuasion"), Value::from(1)],
            vec![Value::from(2), Value::from("Anonymous"), Value::Null],
        ]
    );
}

#[tokio::test]
async fn filter_order_limit() {
    let schema = schema();
    let driver = seed(&schema);
    let id = path(&schema, BOOK, "id");

    let query = Query::all(BOOK)
        .project([id.clone(), path(&schema, BOOK, "title")])
        .filter(Expr::gt(id.clone(), 1))
        .order_by(id, Direction::Desc)
        .limit(1);

    assert_eq!(
        run(&driver, &schema, query).await,
        vec![vec![Value::from(3), Value::from("Emma")]]
    );
}

#[tokio::test]
async fn null_never_matches() {
    let schema = schema();
    let driver = seed(&schema);
    let author = path(&schema, BOOK, "author");

    let query = Query::all(BOOK)
        .project([path(&schema, BOOK, "id")])
        .filter(Expr::ne(author, 5));

    assert_eq!(
        run(&driver, &schema, query).await,
        vec![vec![Value::from(3)], vec![Value::from(1)]]
    );
}

#[tokio::test]
async fn projects_across_relations() {
    let schema = schema();
    let driver = seed(&schema);
    let id = path(&schema, BOOK, "id");

    let query = Query::all(BOOK)
        .project([id.clone(), path(&schema, BOOK, "author__name")])
        .order_by(id, Direction::Asc);

    assert_eq!(
        run(&driver, &schema, query).await,
        vec![
            vec![Value::from(1), Value::from("Alice")],
            vec![Value::from(2), Value::Null],
            vec![Value::from(3), Value::from("Alice")],
        ]
    );
}

#[tokio::test]
async fn to_many_paths_fan_out() {
    let schema = schema();
    let driver = seed(&schema);
    let id = path(&schema, BOOK, "id");

    let query = Query::all(BOOK)
        .project([id.clone(), path(&schema, BOOK, "tags__label")])
        .filter(Expr::eq(id.clone(), 3));
    assert_eq!(
        run(&driver, &schema, query).await,
        vec![
            vec![Value::from(3), Value::from("fiction")],
            vec![Value::from(3), Value::from("classic")],
        ]
    );

    let query = Query::all(AUTHOR)
        .project([path(&schema, AUTHOR, "name"), path(&schema, AUTHOR, "book_set__title")])
        .filter(Expr::eq(path(&schema, AUTHOR, "id"), 1));
    assert_eq!(
        run(&driver, &schema, query).await,
        vec![
            vec![Value::from("Alice"), Value::from("Emma")],
            vec![Value::from("Alice"), Value::from("Persuasion")],
        ]
    );
}

#[tokio::test]
async fn filter_through_reverse_many_to_many() {
    let schema = schema();
    let driver = seed(&schema);

    let query = Query::all(TAG)
        .project([path(&schema, TAG, "label")])
        .filter(Expr::in_list(
            path(&schema, TAG, "book_set__id"),
            [Value::from(2)],
        ));

    assert_eq!(
        run(&driver, &schema, query).await,
        vec![vec![Value::from("classic")]]
    );
}

#[tokio::test]
async fn labels_use_label_fn_and_default() {
    let schema = schema();
    let driver = seed(&schema);

    let response = driver
        .exec(
            &schema,
            Operation::Labels(Labels {
                model: AUTHOR,
                keys: vec![Value::from(2), Value::from(9), Value::from(1)],
            }),
        )
        .await
        .unwrap();
    assert_eq!(
        response.rows,
        vec![
            ValueRecord::from_vec(vec![Value::from(2), Value::from("Bob")]),
            ValueRecord::from_vec(vec![Value::from(1), Value::from("Alice")]),
        ]
    );

    let response = driver
        .exec(
            &schema,
            Operation::Labels(Labels {
                model: TAG,
                keys: vec![Value::from(1)],
            }),
        )
        .await
        .unwrap();
    assert_eq!(
        response.rows,
        vec![ValueRecord::from_vec(vec![
            Value::from(1),
            Value::from("Tag object (1)")
        ])]
    );
}

#[test]
fn insert_rejects_bad_records() {
    let schema = schema();
    let driver = seed(&schema);

    let err = driver
        .insert(AUTHOR, [("id", Value::from(1))])
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let err = driver
        .insert(AUTHOR, [("name", Value::from("Carol"))])
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let err = driver
        .insert(AUTHOR, [("id", Value::from(5)), ("age", Value::from(40))])
        .unwrap_err();
    assert!(err.is_field_not_found());

    assert_eq!(driver.len(AUTHOR), 2);
    assert_eq!(driver.len(BOOK), 3);
}
