use super::Error;

/// Error when a row's width does not match the number of column names handed
/// to frame construction.
#[derive(Debug)]
pub(super) struct InvalidFrame {
    row: usize,
    width: usize,
    columns: usize,
}

impl std::error::Error for InvalidFrame {}

impl core::fmt::Display for InvalidFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid frame: row {} has {} values but {} columns were named",
            self.row, self.width, self.columns
        )
    }
}

impl Error {
    /// Creates an invalid frame error for the row at index `row`.
    pub fn invalid_frame(row: usize, width: usize, columns: usize) -> Error {
        Error::from(super::ErrorKind::InvalidFrame(InvalidFrame {
            row,
            width,
            columns,
        }))
    }

    /// Returns `true` if this error is an invalid frame error.
    pub fn is_invalid_frame(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidFrame(_))
    }
}
