//! Persistence store error types.

/// Kinds of persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PersistenceErrorKind {
    /// Store backend cannot be reached
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
    /// Failed to create the store directory
    #[display("Failed to create store directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to read a collection
    #[display("Failed to read collection: {}", _0)]
    Read(String),
    /// Failed to write a collection
    #[display("Failed to write collection: {}", _0)]
    Write(String),
    /// A collection file exists but does not decode
    #[display("Corrupt collection data: {}", _0)]
    Corrupt(String),
    /// A multi-record write could not be committed
    #[display("Transaction failed: {}", _0)]
    Transaction(String),
    /// Legacy blob import failed
    #[display("Legacy migration failed: {}", _0)]
    Migration(String),
}

/// Persistence error with location tracking.
///
/// # Examples
///
/// ```
/// use anidirector_error::{PersistenceError, PersistenceErrorKind};
///
/// let err = PersistenceError::new(PersistenceErrorKind::Unavailable("disk detached".into()));
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Persistence Error: {} at line {} in {}", kind, line, file)]
pub struct PersistenceError {
    /// The kind of error that occurred
    pub kind: PersistenceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PersistenceError {
    /// Create a new persistence error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PersistenceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
