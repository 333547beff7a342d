use crate::Db;

use rowframe_core::{
    stmt::{BinaryOp, Direction, Expr, Path, Query, Returning, Value, ValueRecord},
    Error, Result,
};
use tokio_stream::Stream;

/// Reads the rows of a query in fixed-size pages.
///
/// Pages are ordered by the root model's primary key and each page resumes
/// strictly after the last key of the previous one. When a path crosses a
/// to-many relation a key owns several rows; a page never splits those rows
/// and a key with more rows than fit in a page is read in a query of its own.
/// Any ordering or limit already on the query is replaced.
///
/// Nothing is fetched until the returned stream is polled. A failing page ends
/// the stream with that error; rows of earlier pages have already been yielded.
#[derive(Debug, Clone)]
pub struct Chunks {
    db: Db,
    query: Query,
    chunk_size: usize,
    reverse: bool,
}

/// What each yielded row holds.
enum Shape {
    /// The values of these paths. The key is fetched in front of them and
    /// removed before the row is yielded.
    Rows(Vec<Path>),

    /// Every concrete field of the model.
    Records,
}

/// A paged read, checked against the schema.
struct Plan {
    query: Query,
    key: Path,
    key_position: usize,
    strip_key: bool,
}

impl Chunks {
    pub const DEFAULT_CHUNK_SIZE: usize = 1000;

    pub fn new(db: Db, query: Query) -> Self {
        Self {
            db,
            query,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            reverse: false,
        }
    }

    /// Maximum number of rows per page. Must be at least 1.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Walk keys from highest to lowest.
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Streams one row per match, holding the values of `paths` in order.
    pub fn rows(
        self,
        paths: Vec<Path>,
    ) -> impl Stream<Item = Result<ValueRecord>> + Send + 'static {
        self.pages(Shape::Rows(paths))
    }

    /// Streams whole records, every concrete field in declaration order.
    pub fn records(self) -> impl Stream<Item = Result<ValueRecord>> + Send + 'static {
        self.pages(Shape::Records)
    }

    fn pages(self, shape: Shape) -> impl Stream<Item = Result<ValueRecord>> + Send + 'static {
        let Chunks {
            db,
            query,
            chunk_size,
            reverse,
        } = self;

        async_stream::try_stream! {
            check_chunk_size(chunk_size)?;

            let Plan {
                query,
                key,
                key_position,
                strip_key,
            } = plan(&db, query, shape, reverse)?;

            let after = if reverse { BinaryOp::Lt } else { BinaryOp::Gt };
            let mut last_key: Option<Value> = None;
            let mut page = 0;

            loop {
                let mut chunk = query.clone();

                if let Some(last_key) = &last_key {
                    chunk = chunk.filter(Expr::binary_op(key.clone(), after, last_key.clone()));
                }

                // One extra row tells whether another page exists, so a table
                // that fits in a single page costs a single fetch.
                let mut rows = db.query(chunk.limit(chunk_size.saturating_add(1))).await?;
                let more = rows.len() > chunk_size;
                page += 1;

                if more {
                    // Rows sharing the lookahead row's key may continue past
                    // the limit. They are dropped here and read again with the
                    // rest of their key on the next page.
                    let boundary = key_of(&rows[chunk_size], key_position, page)?.clone();
                    rows.truncate(chunk_size);

                    while rows
                        .last()
                        .is_some_and(|row| row.get(key_position) == Some(&boundary))
                    {
                        rows.pop();
                    }

                    if rows.is_empty() {
                        tracing::debug!(page, chunk_size, "key spans more than one page");
                        rows = db
                            .query(query.clone().filter(Expr::eq(key.clone(), boundary.clone())))
                            .await?;
                        last_key = Some(boundary);
                    } else {
                        let last = rows.len() - 1;
                        last_key = Some(key_of(&rows[last], key_position, page)?.clone());
                    }
                }

                tracing::debug!(page, rows = rows.len(), chunk_size, more, "fetched page");

                for row in rows {
                    if strip_key {
                        let (_, rest) = row
                            .split_first()
                            .ok_or_else(|| Error::invalid_result("driver returned an empty row"))?;
                        yield rest;
                    } else {
                        yield row;
                    }
                }

                if !more {
                    break;
                }
            }
        }
    }
}

fn plan(db: &Db, mut query: Query, shape: Shape, reverse: bool) -> Result<Plan> {
    let Some(model) = db.schema().models.get(&query.source) else {
        return Err(Error::invalid_argument(format!(
            "query source {:?} is not part of the schema",
            query.source
        )));
    };

    let key = Path::field(model.primary_key);

    let (key_position, strip_key) = match shape {
        Shape::Rows(paths) => {
            let paths = std::iter::once(key.clone()).chain(paths).collect();
            query.returning = Returning::Project(paths);
            (0, true)
        }
        Shape::Records => {
            let position = model
                .concrete_fields()
                .position(|field| field.id == model.primary_key)
                .ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "primary key of `{}` is not a concrete field",
                        model.name.upper_camel_case()
                    ))
                })?;
            query.returning = Returning::Model;
            (position, false)
        }
    };

    let direction = if reverse {
        Direction::Desc
    } else {
        Direction::Asc
    };

    query.limit = None;
    let query = query.order_by(key.clone(), direction);

    Ok(Plan {
        query,
        key,
        key_position,
        strip_key,
    })
}

fn key_of(row: &ValueRecord, position: usize, page: usize) -> Result<&Value> {
    row.get(position)
        .filter(|value| !value.is_null())
        .ok_or_else(|| {
            Error::invalid_result(format!("page {page} holds a row without a primary key"))
        })
}

fn check_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::invalid_argument("chunk size must be at least 1"));
    }
    Ok(())
}
