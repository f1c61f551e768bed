use std::sync::Arc;

use serde::Serialize;

use srs_core::model::{Deck, DeckFilter, DeckId, ProgressStats, average_mastery};
use storage::repository::{CardRepository, DeckRepository};

use crate::Clock;
use crate::error::DeckServiceError;

/// Deck plus the numbers shown on its browser tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckOverview {
    pub deck_id: DeckId,
    pub name: String,
    pub category: Option<String>,
    pub card_count: usize,
    pub mastery: u8,
}

/// Read-side queries for the deck browser and dashboard.
#[derive(Clone)]
pub struct DeckService {
    clock: Clock,
    decks: Arc<dyn DeckRepository>,
    cards: Arc<dyn CardRepository>,
    learned_threshold: u8,
}

impl DeckService {
    #[must_use]
    pub fn new(clock: Clock, decks: Arc<dyn DeckRepository>, cards: Arc<dyn CardRepository>) -> Self {
        Self {
            clock,
            decks,
            cards,
            learned_threshold: 80,
        }
    }

    /// Knowledge level at which a card counts as learned (default 80).
    #[must_use]
    pub fn with_learned_threshold(mut self, threshold: u8) -> Self {
        self.learned_threshold = threshold.min(100);
        self
    }

    /// Decks in store order.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub fn list_decks(&self) -> Result<Vec<Deck>, DeckServiceError> {
        Ok(self.decks.list_decks()?)
    }

    /// Decks matching a name query and/or category.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub fn filter_decks(&self, filter: &DeckFilter) -> Result<Vec<Deck>, DeckServiceError> {
        let mut decks = self.decks.list_decks()?;
        decks.retain(|d| d.matches(filter));
        Ok(decks)
    }

    /// Distinct deck categories in order of first appearance.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub fn categories(&self) -> Result<Vec<String>, DeckServiceError> {
        let mut seen: Vec<String> = Vec::new();
        for deck in self.decks.list_decks()? {
            if let Some(category) = deck.category() {
                if !seen.iter().any(|c| c == category.as_str()) {
                    seen.push(category.as_str().to_owned());
                }
            }
        }
        Ok(seen)
    }

    /// Card count and mastery for one deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::DeckNotFound` if the deck does not exist.
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub fn overview(&self, deck_id: DeckId) -> Result<DeckOverview, DeckServiceError> {
        let deck = self
            .decks
            .get_deck(deck_id)?
            .ok_or(DeckServiceError::DeckNotFound(deck_id))?;
        self.overview_of(&deck)
    }

    /// Overviews for every deck matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub fn overviews(&self, filter: &DeckFilter) -> Result<Vec<DeckOverview>, DeckServiceError> {
        self.filter_decks(filter)?
            .iter()
            .map(|deck| self.overview_of(deck))
            .collect()
    }

    /// Progress over every card in the store, measured against the service clock.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub fn progress(&self) -> Result<ProgressStats, DeckServiceError> {
        let cards = self.cards.all_cards()?;
        Ok(ProgressStats::from_cards(
            &cards,
            self.clock.now(),
            self.learned_threshold,
        ))
    }

    /// Progress over a single deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub fn deck_progress(&self, deck_id: DeckId) -> Result<ProgressStats, DeckServiceError> {
        let cards = self.cards.cards_for_deck(deck_id)?;
        Ok(ProgressStats::from_cards(
            &cards,
            self.clock.now(),
            self.learned_threshold,
        ))
    }

    fn overview_of(&self, deck: &Deck) -> Result<DeckOverview, DeckServiceError> {
        let cards = self.cards.cards_for_deck(deck.id())?;
        Ok(DeckOverview {
            deck_id: deck.id(),
            name: deck.name().to_owned(),
            category: deck.category().map(|c| c.as_str().to_owned()),
            card_count: cards.len(),
            mastery: average_mastery(&cards),
        })
    }
}
