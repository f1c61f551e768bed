use std::marker::PhantomData;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("text must not be empty")]
    Empty,
}

/// Non-empty text tagged with the card field it belongs to.
#[derive(Debug)]
pub struct Text<T> {
    value: String,
    _field: PhantomData<T>,
}

#[derive(Debug)]
pub enum Term {}
#[derive(Debug)]
pub enum Definition {}

pub type TermText = Text<Term>;
pub type DefinitionText = Text<Definition>;

impl<T> Text<T> {
    /// Parse trimmed, non-empty text.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for empty or whitespace-only input.
    pub fn parse(s: impl Into<String>) -> Result<Self, TextError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self {
            value: trimmed.to_owned(),
            _field: PhantomData,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

// Manual impls: derives would require `T: Clone`/`T: PartialEq` on the marker.
impl<T> Clone for Text<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _field: PhantomData,
        }
    }
}

impl<T> PartialEq for Text<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Text<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_blank() {
        let term = TermText::parse("  Concierge ").unwrap();
        assert_eq!(term.as_str(), "Concierge");
        assert_eq!(DefinitionText::parse("   ").unwrap_err(), TextError::Empty);
    }
}
