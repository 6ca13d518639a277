//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, JsonError, NotFoundError, PersistenceError, ValidationError,
};

/// Every failure the workspace can report, discriminated by concern.
///
/// # Examples
///
/// ```
/// use anidirector_error::{AniDirectorError, AniDirectorErrorKind, ConfigError};
///
/// let err: AniDirectorError = ConfigError::new("missing data_dir").into();
/// assert!(matches!(err.kind(), AniDirectorErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AniDirectorErrorKind {
    /// Inbound document failed validation
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Referenced entity is absent
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// External generation call failed
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Store read or write failed
    #[from(PersistenceError)]
    Persistence(PersistenceError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// Anidirector error with kind discrimination.
///
/// # Examples
///
/// ```
/// use anidirector_error::{AniDirectorResult, PersistenceError, PersistenceErrorKind};
///
/// fn save() -> AniDirectorResult<()> {
///     Err(PersistenceError::new(PersistenceErrorKind::Write("read-only".into())))?
/// }
///
/// assert!(save().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Anidirector Error: {}", _0)]
pub struct AniDirectorError(Box<AniDirectorErrorKind>);

impl AniDirectorError {
    /// Create a new error from a kind.
    pub fn new(kind: AniDirectorErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AniDirectorErrorKind {
        &self.0
    }
}

impl<T> From<T> for AniDirectorError
where
    T: Into<AniDirectorErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for anidirector operations.
pub type AniDirectorResult<T> = std::result::Result<T, AniDirectorError>;
