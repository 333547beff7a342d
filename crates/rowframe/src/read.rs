use crate::{verbose, Db, Frame, ReadOptions};

use rowframe_core::{stmt::Query, Error, Result};
use std::time::Instant;
use tokio_stream::StreamExt;

/// Reads the rows of `query` into a [`Frame`].
///
/// Returns a builder; nothing is fetched until [`ReadFrame::exec`] is awaited.
pub fn read_frame(db: &Db, query: Query) -> ReadFrame<'_> {
    ReadFrame {
        db,
        query,
        options: ReadOptions::default(),
    }
}

/// Builder returned by [`read_frame`].
#[derive(Debug)]
#[must_use = "call `.exec().await` to read the frame"]
pub struct ReadFrame<'a> {
    db: &'a Db,
    query: Query,
    options: ReadOptions,
}

impl ReadFrame<'_> {
    /// Dotted paths to read, such as `author__country__name`.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.fields(fields);
        self
    }

    /// Promote a column to the row index. The column is read even when it
    /// is not among [`fields`](Self::fields).
    pub fn index_col(mut self, index_col: impl Into<String>) -> Self {
        self.options = self.options.index_col(index_col);
        self
    }

    pub fn coerce_float(mut self, coerce_float: bool) -> Self {
        self.options = self.options.coerce_float(coerce_float);
        self
    }

    /// Replace foreign keys and choice values with their labels. On by default.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options = self.options.verbose(verbose);
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.options = self.options.chunk_size(chunk_size);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.options = self.options.reverse(reverse);
        self
    }

    /// Replace every setting at once.
    pub fn options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn exec(self) -> Result<Frame> {
        let start = Instant::now();
        let ReadFrame { db, query, options } = self;
        let schema = db.schema().clone();

        let Some(model) = schema.models.get(&query.source) else {
            return Err(Error::invalid_argument(format!(
                "query source {:?} is not part of the schema",
                query.source
            )));
        };

        // Column names, in order. An index column missing from an explicit
        // field list is read as an extra trailing column.
        let mut names = options.fields.clone();

        if names.is_empty() {
            names = match query.projection() {
                Some(paths) => paths.iter().map(|path| path.display(&schema)).collect(),
                None => model
                    .concrete_fields()
                    .map(|field| field.name.app_name.clone())
                    .collect(),
            };
        } else if let Some(index_col) = &options.index_col {
            if !names.contains(index_col) {
                names.push(index_col.clone());
            }
        }

        let resolved = schema
            .resolve_fields(query.source, &names)
            .collect::<Result<Vec<_>>>()?;

        let paths: Vec<_> = resolved.iter().map(|field| field.path.clone()).collect();
        let labels: Vec<_> = resolved.iter().map(verbose::Labels::for_field).collect();

        let rows = if query.is_projected() {
            tracing::debug!(
                model = %model.name.upper_camel_case(),
                "query is already projected; fetching in one shot"
            );
            db.query(query.project(paths)).await?
        } else {
            let stream = db
                .chunks(query)
                .chunk_size(options.chunk_size)
                .reverse(options.reverse)
                .rows(paths);
            let mut stream = std::pin::pin!(stream);

            let mut rows = vec![];
            while let Some(row) = stream.next().await {
                rows.push(row?);
            }
            rows
        };

        let mut frame = Frame::from_records(names, rows)?;

        if options.coerce_float {
            // Keys and choice values stay as stored so the label lookup can
            // still match them.
            for (column, labels) in frame.columns_mut().iter_mut().zip(&labels) {
                if !options.verbose || labels.is_keep() {
                    column.coerce_float();
                }
            }
        }

        if options.verbose {
            verbose::apply(db, &mut frame, &labels).await?;
        }

        if let Some(index_col) = &options.index_col {
            frame.set_index(index_col)?;
        }

        tracing::info!(
            model = %model.name.upper_camel_case(),
            rows = frame.len(),
            elapsed = ?start.elapsed(),
            "read frame"
        );

        Ok(frame)
    }
}
