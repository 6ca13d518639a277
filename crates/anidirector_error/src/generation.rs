//! Errors from the external generation collaborator and retry classification.

/// Failure modes of a generation call.
///
/// Transient kinds are eligible for a bounded retry; everything else is
/// treated as permanent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Provider quota exhausted (HTTP 429 / RESOURCE_EXHAUSTED)
    #[display("Rate limited by provider: {}", _0)]
    RateLimited(String),
    /// Provider temporarily unavailable (HTTP 5xx)
    #[display("Provider unavailable: {}", _0)]
    Unavailable(String),
    /// Request timed out
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// Credential or permission failure (HTTP 401/403 / PERMISSION_DENIED)
    #[display("Permission denied: {}", _0)]
    PermissionDenied(String),
    /// No API key configured
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Other HTTP failure with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The provider answered without the requested media or text
    #[display("Provider returned no usable content")]
    EmptyResponse,
    /// The provider answered with content that could not be interpreted
    #[display("Invalid provider response: {}", _0)]
    InvalidResponse(String),
    /// The request could not be sent
    #[display("Request failed: {}", _0)]
    Request(String),
}

impl GenerationErrorKind {
    /// Classify an HTTP failure by status code and provider message.
    ///
    /// # Examples
    ///
    /// ```
    /// use anidirector_error::GenerationErrorKind;
    ///
    /// let kind = GenerationErrorKind::from_status(429, "quota exceeded");
    /// assert!(matches!(kind, GenerationErrorKind::RateLimited(_)));
    /// assert!(kind.is_retryable());
    ///
    /// let kind = GenerationErrorKind::from_status(400, "PERMISSION_DENIED: key revoked");
    /// assert!(!kind.is_retryable());
    /// ```
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status_code == 429 || message.contains("RESOURCE_EXHAUSTED") {
            Self::RateLimited(message)
        } else if matches!(status_code, 401 | 403) || message.contains("PERMISSION_DENIED") {
            Self::PermissionDenied(message)
        } else if status_code == 408 {
            Self::Timeout(message)
        } else if matches!(status_code, 500 | 502 | 503 | 504) {
            Self::Unavailable(message)
        } else {
            Self::Http {
                status_code,
                message,
            }
        }
    }

    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::RateLimited(_)
            | GenerationErrorKind::Unavailable(_)
            | GenerationErrorKind::Timeout(_) => true,
            GenerationErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            GenerationErrorKind::RateLimited(_) => (2000, 1, 10),
            GenerationErrorKind::Unavailable(_) => (2000, 1, 10),
            GenerationErrorKind::Timeout(_) => (1000, 1, 5),
            _ => (2000, 0, 0),
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use anidirector_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::PermissionDenied("key revoked".into()));
/// assert!(!err.is_retryable());
/// assert!(err.to_string().contains("Permission denied"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the failure is transient (rate limit, outage, timeout).
    pub fn is_transient(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Result type for calls into the generation collaborator.
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;

/// Trait for errors that support retry logic.
///
/// Transient failures such as 429 or 503 return true from
/// [`is_retryable`](Self::is_retryable); credential failures and malformed
/// requests return false and are never retried.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 1, 10)
    }
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}
