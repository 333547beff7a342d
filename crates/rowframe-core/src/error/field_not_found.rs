use super::Error;

/// Error when a dotted field path names a segment that is neither a declared
/// field nor a reverse relation accessor on the model reached so far.
#[derive(Debug)]
pub(super) struct FieldNotFound {
    model: Box<str>,
    segment: Box<str>,
    path: Box<str>,
}

impl std::error::Error for FieldNotFound {}

impl core::fmt::Display for FieldNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "field not found: `{}` has no field or reverse relation `{}` (resolving `{}`)",
            self.model, self.segment, self.path
        )
    }
}

impl Error {
    /// Creates a field not found error.
    ///
    /// `model` is the model the failing `segment` was looked up on and `path`
    /// is the full dotted path being resolved.
    pub fn field_not_found(
        model: impl Into<String>,
        segment: impl Into<String>,
        path: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::FieldNotFound(FieldNotFound {
            model: model.into().into(),
            segment: segment.into().into(),
            path: path.into().into(),
        }))
    }

    /// Returns `true` if this error is a field not found error.
    pub fn is_field_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::FieldNotFound(_))
    }
}
