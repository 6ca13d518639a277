//! Trait definitions for the anidirector storyboard workspace.
//!
//! The core drives an external generative-media service through
//! [`MediaGenerator`]; this crate defines that seam and the request types
//! that cross it, so the storyboard core never depends on a concrete
//! provider.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::MediaGenerator;
pub use types::{ImageQuality, ImageRequest, ImageRequestBuilder};
