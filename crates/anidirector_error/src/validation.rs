//! Validation errors for inbound documents.

/// Reasons an inbound document is rejected.
///
/// A validation failure is always raised before any state is touched, so a
/// rejected document never leaves a partial change behind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// A required top-level field is absent or null
    #[display("Missing required field: {}", _0)]
    MissingField(String),
    /// The document is not parseable JSON
    #[display("Malformed document: {}", _0)]
    Malformed(String),
    /// The document parses but a field has the wrong shape
    #[display("Unexpected document shape: {}", _0)]
    UnsupportedShape(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use anidirector_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::MissingField("storyboard".into()));
/// assert!(err.to_string().contains("storyboard"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
