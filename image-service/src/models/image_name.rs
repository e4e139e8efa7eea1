//! Client-supplied image filenames.
//!
//! The filename is the storage key, so it must name exactly one entry
//! directly inside the upload directory.

use crate::services::storage::STAGING_DIR;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageNameError {
    #[error("Filename must not be empty")]
    Empty,

    #[error("Filename must not contain path separators")]
    PathSeparator,

    #[error("Filename must not contain NUL bytes")]
    Nul,

    #[error("Filename '{0}' is reserved")]
    Reserved(String),
}

/// A filename that is safe to join onto the upload directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName(String);

impl ImageName {
    pub fn parse(raw: &str) -> Result<Self, ImageNameError> {
        if raw.is_empty() {
            return Err(ImageNameError::Empty);
        }
        if raw.contains(['/', '\\']) {
            return Err(ImageNameError::PathSeparator);
        }
        if raw.contains('\0') {
            return Err(ImageNameError::Nul);
        }
        if matches!(raw, "." | "..") || raw == STAGING_DIR {
            return Err(ImageNameError::Reserved(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
