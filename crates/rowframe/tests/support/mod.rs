#![allow(dead_code)]

mod exec_log;
pub use exec_log::ExecLog;

mod failing_driver;
pub use failing_driver::FailingDriver;

mod logging_driver;
pub use logging_driver::LoggingDriver;

use rowframe::{
    schema::{Model, ModelId},
    stmt::{Type, Value},
    Db, Schema,
};
use rowframe_driver_memory::Memory;
use rust_decimal::Decimal;
use std::sync::Arc;

pub const COUNTRY: ModelId = ModelId(0);
pub const AUTHOR: ModelId = ModelId(1);
pub const BOOK: ModelId = ModelId(2);
pub const TAG: ModelId = ModelId(3);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn schema() -> Arc<Schema> {
    let mut builder = Schema::builder();
    builder.model(
        Model::builder("Country")
            .primary_key("id", Type::I64)
            .field("name", Type::String),
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
            .nullable()
            .field("price", Type::Decimal)
            .nullable()
            .field("format", Type::String)
            .choices([("hc", "Hardcover"), ("pb", "Paperback")])
            .many_to_many("tags", TAG),
    );
    builder.model(
        Model::builder("Tag")
            .primary_key("id", Type::I64)
            .field("label", Type::String),
    );
    Arc::new(builder.build().unwrap())
}

/// A store holding one country, two authors and `books` books.
///
/// Book `n` is titled `"Book n"`, costs `n.50`, is written by Alice when `n`
/// is odd and by Bob otherwise, and is a hardcover when `n` is odd. Books are
/// inserted from the highest id down.
pub fn memory(schema: &Arc<Schema>, books: i64) -> Memory {
    let name = |record: &rowframe::stmt::ValueRecord| {
        record[1].as_str().unwrap_or_default().to_string()
    };

    let driver = Memory::new(schema.clone())
        .with_label(COUNTRY, name)
        .with_label(AUTHOR, name);

    driver
        .insert(COUNTRY, [("id", Value::I64(1)), ("name", "France".into())])
        .unwrap();

    for (id, name, country) in [(1, "Alice", Value::I64(1)), (2, "Bob", Value::Null)] {
        driver
            .insert(
                AUTHOR,
                [
                    ("id", Value::I64(id)),
                    ("name", name.into()),
                    ("country", country),
                ],
            )
            .unwrap();
    }

    for (id, label) in [(1, "fiction"), (2, "classic")] {
        driver
            .insert(TAG, [("id", Value::I64(id)), ("label", label.into())])
            .unwrap();
    }

    for id in (1..=books).rev() {
        let odd = id % 2 == 1;

        driver
            .insert(
                BOOK,
                [
                    ("id", Value::I64(id)),
                    ("title", format!("Book {id}").into()),
                    ("author", Value::I64(if odd { 1 } else { 2 })),
                    ("price", Decimal::new(id * 100 + 50, 2).into()),
                    ("format", if odd { "hc" } else { "pb" }.into()),
                    ("tags", Value::List(vec![Value::I64(1)])),
                ],
            )
            .unwrap();
    }

    driver
}

/// A database over [`memory`] whose operations are logged.
pub fn db(books: i64) -> (Db, ExecLog) {
    init_tracing();

    let schema = schema();
    let driver = LoggingDriver::new(memory(&schema, books));
    let log = driver.log();

    (Db::new(schema, driver), log)
}
