use crate::Chunks;

/// Settings for [`read_frame`](crate::read_frame)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReadOptions {
    /// Dotted field paths to read, one column each. Empty means the query's
    /// projection, or the model's concrete fields.
    pub fields: Vec<String>,

    /// Column to use as the row index
    pub index_col: Option<String>,

    /// Convert decimal and numeric-string columns to floats
    pub coerce_float: bool,

    /// Replace foreign keys and choice values by their display labels
    pub verbose: bool,

    /// Rows per page when reading in chunks
    pub chunk_size: usize,

    /// Read pages from the highest key down
    pub reverse: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn index_col(mut self, index_col: impl Into<String>) -> Self {
        self.index_col = Some(index_col.into());
        self
    }

    pub fn coerce_float(mut self, coerce_float: bool) -> Self {
        self.coerce_float = coerce_float;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            fields: vec![],
            index_col: None,
            coerce_float: false,
            verbose: true,
            chunk_size: Chunks::DEFAULT_CHUNK_SIZE,
            reverse: false,
        }
    }
}
