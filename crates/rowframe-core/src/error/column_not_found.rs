use super::Error;

/// Error when a frame operation names a column the frame does not have.
#[derive(Debug)]
pub(super) struct ColumnNotFound {
    name: Box<str>,
}

impl std::error::Error for ColumnNotFound {}

impl core::fmt::Display for ColumnNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "column not found: `{}`", self.name)
    }
}

impl Error {
    /// Creates a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ColumnNotFound(ColumnNotFound {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a column not found error.
    pub fn is_column_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ColumnNotFound(_))
    }
}
