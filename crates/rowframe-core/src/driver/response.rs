use crate::stmt::ValueRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub rows: Vec<ValueRecord>,
}

impl Response {
    pub fn rows(rows: impl IntoIterator<Item = ValueRecord>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<ValueRecord> {
        self.rows
    }
}
