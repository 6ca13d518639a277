//! Error types for the anidirector workspace.
//!
//! Every crate in the workspace reports failures through the types defined
//! here, so callers can tell a malformed backup apart from a missing scene,
//! a rate-limited generation call, or an unavailable store.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The four domain concerns are [`ValidationError`], [`NotFoundError`],
//! [`GenerationError`] and [`PersistenceError`]. [`ConfigError`] and
//! [`JsonError`] cover the ambient plumbing.
//!
//! # Examples
//!
//! ```
//! use anidirector_error::{AniDirectorResult, NotFoundError, NotFoundErrorKind};
//!
//! fn find_scene(id: u32) -> AniDirectorResult<()> {
//!     Err(NotFoundError::new(NotFoundErrorKind::Scene(id)))?
//! }
//!
//! assert!(find_scene(7).unwrap_err().to_string().contains("Scene 7"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod generation;
mod message;
mod not_found;
mod persistence;
mod validation;

pub use error::{AniDirectorError, AniDirectorErrorKind, AniDirectorResult};
pub use generation::{GenerationError, GenerationErrorKind, GenerationResult, RetryableError};
pub use message::{ConfigError, JsonError};
pub use not_found::{NotFoundError, NotFoundErrorKind};
pub use persistence::{PersistenceError, PersistenceErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
