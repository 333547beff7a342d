mod coerce;

mod record_batch;

mod column;
pub use column::Column;

use rowframe_core::{
    stmt::{Value, ValueRecord},
    Error, Result,
};

/// Rows of values organized as named columns, with an optional index.
///
/// Columns keep the order they were named in. Column names are not required
/// to be unique; lookups by name return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    index: Option<Column>,
    columns: Vec<Column>,
    len: usize,
}

impl Frame {
    /// Builds a frame from row tuples. Every row must hold exactly one value
    /// per name.
    pub fn from_records<I, S>(
        names: I,
        rows: impl IntoIterator<Item = ValueRecord>,
    ) -> Result<Frame>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<_> = names
            .into_iter()
            .map(|name| Column::new(name, vec![]))
            .collect();
        let mut len = 0;

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::invalid_frame(i, row.len(), columns.len()));
            }

            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }

            len += 1;
        }

        Ok(Frame {
            index: None,
            columns,
            len,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    pub fn index(&self) -> Option<&Column> {
        self.index.as_ref()
    }

    /// The values of row `row`, index excluded.
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        if row >= self.len {
            return None;
        }

        self.columns.iter().map(|column| column.get(row)).collect()
    }

    /// Moves the column `name` out of the frame and makes it the row index,
    /// replacing any previous index.
    pub fn set_index(&mut self, name: &str) -> Result<()> {
        let position = self
            .columns
            .iter()
            .position(|column| column.name() == name)
            .ok_or_else(|| Error::column_not_found(name))?;

        self.index = Some(self.columns.remove(position));
        Ok(())
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }
}
