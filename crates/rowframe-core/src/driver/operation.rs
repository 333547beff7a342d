use crate::{schema::ModelId, stmt};

#[derive(Debug, Clone)]
pub enum Operation {
    /// Run a query and return its rows
    Query(stmt::Query),

    /// Render records of a model as display strings
    Labels(Labels),
}

/// Looks up the display string of each record whose primary key is in `keys`.
///
/// The response holds one `(key, label)` row per record found. Keys with no
/// record are left out.
#[derive(Debug, Clone)]
pub struct Labels {
    pub model: ModelId,
    pub keys: Vec<stmt::Value>,
}

impl Operation {
    pub fn is_query(&self) -> bool {
        matches!(self, Operation::Query(_))
    }

    pub fn is_labels(&self) -> bool {
        matches!(self, Operation::Labels(_))
    }
}

impl From<stmt::Query> for Operation {
    fn from(value: stmt::Query) -> Self {
        Self::Query(value)
    }
}

impl From<Labels> for Operation {
    fn from(value: Labels) -> Self {
        Self::Labels(value)
    }
}
