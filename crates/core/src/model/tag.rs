use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("label cannot be empty")]
    EmptyName,
}

fn validated(value: impl Into<String>) -> Result<String, LabelError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LabelError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

/// Validated tag name (trimmed, non-empty). Used for card filtering only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// # Errors
    ///
    /// Returns `LabelError::EmptyName` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LabelError> {
        validated(value).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Topic a card or deck is filed under, e.g. "Check-in" or "Front Desk".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    /// # Errors
    ///
    /// Returns `LabelError::EmptyName` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LabelError> {
        validated(value).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_name_trims_whitespace() {
        let tag = TagName::new("  front-desk ").unwrap();
        assert_eq!(tag.as_str(), "front-desk");
        assert_eq!(tag.to_string(), "front-desk");
    }

    #[test]
    fn empty_labels_are_rejected() {
        assert_eq!(TagName::new("   ").unwrap_err(), LabelError::EmptyName);
        assert_eq!(Category::new("").unwrap_err(), LabelError::EmptyName);
    }
}
