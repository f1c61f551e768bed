use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::content::MediaUri;
use crate::model::ids::DeckId;
use crate::model::tag::Category;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck name cannot be empty")]
    EmptyName,
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// A named collection of flashcards.
///
/// Cards reference their deck through `Card::deck_id`; the deck itself only
/// carries display metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    id: DeckId,
    name: String,
    description: Option<String>,
    category: Option<Category>,
    cover_image: Option<MediaUri>,
    created_at: DateTime<Utc>,
}

impl Deck {
    /// Creates a new Deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: DeckId,
        name: impl Into<String>,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DeckError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DeckError::EmptyName);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            description,
            category: None,
            cover_image: None,
            created_at,
        })
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_cover_image(mut self, image: MediaUri) -> Self {
        self.cover_image = Some(image);
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> DeckId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    #[must_use]
    pub fn cover_image(&self) -> Option<&MediaUri> {
        self.cover_image.as_ref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn matches(&self, filter: &DeckFilter) -> bool {
        filter.matches(self)
    }
}

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

/// Deck browser search: case-insensitive name substring plus optional category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckFilter {
    query: Option<String>,
    category: Option<String>,
}

impl DeckFilter {
    /// A filter that matches every deck.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into().trim().to_lowercase();
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into().trim().to_owned();
        self.category = if category.is_empty() {
            None
        } else {
            Some(category)
        };
        self
    }

    #[must_use]
    pub fn matches(&self, deck: &Deck) -> bool {
        let name_ok = self
            .query
            .as_deref()
            .is_none_or(|q| deck.name().to_lowercase().contains(q));
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| deck.category().is_some_and(|dc| dc.as_str() == c));
        name_ok && category_ok
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
