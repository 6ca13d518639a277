//! Errors for references that do not resolve at mutation time.

/// The entity that could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NotFoundErrorKind {
    /// No scene with this id in the active storyboard
    #[display("Scene {} not found in the active storyboard", _0)]
    Scene(u32),
    /// No roster member with this id
    #[display("Character {} not found in the roster", _0)]
    Character(String),
    /// No saved project with this id
    #[display("Project {} not found", _0)]
    Project(String),
    /// The active project has no storyboard yet
    #[display("The active project has no storyboard")]
    Storyboard,
}

/// Not-found error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Found: {} at line {} in {}", kind, line, file)]
pub struct NotFoundError {
    /// The kind of error that occurred
    pub kind: NotFoundErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new not-found error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NotFoundErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
