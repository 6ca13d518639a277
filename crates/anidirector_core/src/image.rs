//! Encoded image references.

use serde::{Deserialize, Serialize};

/// An encoded image, stored inline as a `data:` URL.
///
/// Images travel through the store and backup documents as opaque strings;
/// only the model client ever looks inside them.
///
/// # Examples
///
/// ```
/// use anidirector_core::ImageRef;
///
/// let image = ImageRef::from_base64("image/png", "iVBORw0KGgo=");
/// assert_eq!(image.as_str(), "data:image/png;base64,iVBORw0KGgo=");
/// assert_eq!(image.data_url_parts(), Some(("image/png", "iVBORw0KGgo=")));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap already-encoded base64 data with its MIME type.
    pub fn from_base64(mime_type: &str, data: &str) -> Self {
        Self(format!("data:{mime_type};base64,{data}"))
    }

    /// The raw reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a `data:<mime>;base64,<payload>` reference into MIME type and payload.
    ///
    /// Returns `None` for references that are not base64 data URLs.
    pub fn data_url_parts(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        Some((mime_type, payload))
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
