use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaValidationError {
    #[error("media URI cannot be empty")]
    EmptyMediaUri,

    #[error("media URL is not valid: {0}")]
    InvalidUrl(String),

    #[error("audio language tag cannot be empty")]
    EmptyLanguage,
}

//
// ─── MEDIA REFERENCES ──────────────────────────────────────────────────────────
//

/// Location of an image or audio asset. The scheduler never reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaUri {
    FilePath(PathBuf),
    Url(Url),
}

impl MediaUri {
    /// # Errors
    ///
    /// Returns `MediaValidationError::EmptyMediaUri` for an empty path.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, MediaValidationError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        Ok(MediaUri::FilePath(p))
    }

    /// # Errors
    ///
    /// Returns `MediaValidationError::EmptyMediaUri` for blank input and
    /// `MediaValidationError::InvalidUrl` when the URL does not parse.
    pub fn from_url(url: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let s = url.as_ref().trim();
        if s.is_empty() {
            return Err(MediaValidationError::EmptyMediaUri);
        }
        let u = Url::parse(s).map_err(|e| MediaValidationError::InvalidUrl(e.to_string()))?;
        Ok(MediaUri::Url(u))
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            MediaUri::FilePath(p) => Some(p.as_path()),
            MediaUri::Url(_) => None,
        }
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            MediaUri::Url(u) => Some(u),
            MediaUri::FilePath(_) => None,
        }
    }
}

/// Pronunciation clip attached to a card front, tagged with a language code
/// such as `en` or `km`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    language: String,
    uri: MediaUri,
}

impl AudioClip {
    /// # Errors
    ///
    /// Returns `MediaValidationError::EmptyLanguage` if the language tag is blank.
    pub fn new(language: impl Into<String>, uri: MediaUri) -> Result<Self, MediaValidationError> {
        let language = language.into().trim().to_ascii_lowercase();
        if language.is_empty() {
            return Err(MediaValidationError::EmptyLanguage);
        }
        Ok(Self { language, uri })
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn uri(&self) -> &MediaUri {
        &self.uri
    }
}
