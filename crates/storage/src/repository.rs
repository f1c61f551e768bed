use srs_core::model::{Card, CardId, Deck, DeckId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Repository contract for decks.
pub trait DeckRepository: Send + Sync {
    /// Persist or update a deck.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deck cannot be stored.
    fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError>;

    /// Fetch a deck by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure. A missing deck is `Ok(None)`.
    fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError>;

    /// All decks in the order they were first stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    fn list_decks(&self) -> Result<Vec<Deck>, StorageError>;
}

/// Repository contract for cards.
///
/// Writes are visible to every subsequent read through the same repository.
pub trait CardRepository: Send + Sync {
    /// Persist or update a card.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a card with the same ID is already
    /// stored under a different deck, or other storage errors.
    fn upsert_card(&self, card: &Card) -> Result<(), StorageError>;

    /// Fetch a single card by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure. A missing card is `Ok(None)`.
    fn get_card(&self, id: CardId) -> Result<Option<Card>, StorageError>;

    /// Fetch cards for a deck by IDs, in the order requested.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if any are missing, or other storage errors.
    fn get_cards(&self, deck_id: DeckId, ids: &[CardId]) -> Result<Vec<Card>, StorageError>;

    /// Every card of a deck, in the order the cards were first stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure. An unknown deck yields an
    /// empty list.
    fn cards_for_deck(&self, deck_id: DeckId) -> Result<Vec<Card>, StorageError>;

    /// Every stored card across all decks.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    fn all_cards(&self) -> Result<Vec<Card>, StorageError>;
}

#[derive(Debug, Default)]
struct Inner {
    decks: HashMap<DeckId, Deck>,
    deck_order: Vec<DeckId>,
    cards: HashMap<CardId, Card>,
    card_order: Vec<CardId>,
    // deck -> card ids, insertion order
    deck_cards: HashMap<DeckId, Vec<CardId>>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

impl DeckRepository for InMemoryRepository {
    fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.decks.insert(deck.id(), deck.clone()).is_none() {
            guard.deck_order.push(deck.id());
        }
        Ok(())
    }

    fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.decks.get(&id).cloned())
    }

    fn list_decks(&self) -> Result<Vec<Deck>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .deck_order
            .iter()
            .filter_map(|id| guard.decks.get(id).cloned())
            .collect())
    }
}

impl CardRepository for InMemoryRepository {
    fn upsert_card(&self, card: &Card) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        match guard.cards.get(&card.id()) {
            Some(existing) if existing.deck_id() != card.deck_id() => {
                return Err(StorageError::Conflict(format!(
                    "card {} belongs to deck {}, not {}",
                    card.id(),
                    existing.deck_id(),
                    card.deck_id()
                )));
            }
            Some(_) => {}
            None => {
                guard.card_order.push(card.id());
                guard
                    .deck_cards
                    .entry(card.deck_id())
                    .or_default()
                    .push(card.id());
            }
        }
        guard.cards.insert(card.id(), card.clone());
        Ok(())
    }

    fn get_card(&self, id: CardId) -> Result<Option<Card>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.cards.get(&id).cloned())
    }

    fn get_cards(&self, deck_id: DeckId, ids: &[CardId]) -> Result<Vec<Card>, StorageError> {
        let guard = self.lock()?;
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            match guard.cards.get(id) {
                Some(card) if card.deck_id() == deck_id => found.push(card.clone()),
                _ => return Err(StorageError::NotFound),
            }
        }
        Ok(found)
    }

    fn cards_for_deck(&self, deck_id: DeckId) -> Result<Vec<Card>, StorageError> {
        let guard = self.lock()?;
        let Some(ids) = guard.deck_cards.get(&deck_id) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| guard.cards.get(id).cloned())
            .collect())
    }

    fn all_cards(&self) -> Result<Vec<Card>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .card_order
            .iter()
            .filter_map(|id| guard.cards.get(id).cloned())
            .collect())
    }
}

/// Aggregates deck and card repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub decks: Arc<dyn DeckRepository>,
    pub cards: Arc<dyn CardRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let decks: Arc<dyn DeckRepository> = Arc::new(repo.clone());
        let cards: Arc<dyn CardRepository> = Arc::new(repo);
        Self { decks, cards }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srs_core::model::{CardBack, CardFront, Quality};
    use srs_core::review_card;
    use srs_core::time::fixed_now;

    fn build_deck(id: u64) -> Deck {
        Deck::new(DeckId::new(id), format!("Deck {id}"), None, fixed_now()).unwrap()
    }

    fn build_card(id: u64, deck_id: DeckId) -> Card {
        Card::new(
            CardId::new(id),
            deck_id,
            CardFront::new(format!("Term {id}")).unwrap(),
            CardBack::new(format!("Definition {id}")).unwrap(),
            fixed_now(),
        )
    }

    #[test]
    fn round_trips_reviewed_card() {
        let repo = InMemoryRepository::new();
        let deck = build_deck(1);
        repo.upsert_deck(&deck).unwrap();

        let card = build_card(1, deck.id());
        repo.upsert_card(&card).unwrap();

        let reviewed = review_card(&card, Quality::new(5).unwrap(), fixed_now());
        repo.upsert_card(&reviewed).unwrap();

        let fetched = repo.get_cards(deck.id(), &[card.id()]).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].scheduling().consecutive_correct(), 1);
        assert_eq!(fetched[0].last_reviewed(), Some(fixed_now()));
        assert_eq!(repo.all_cards().unwrap().len(), 1);
    }

    #[test]
    fn cards_for_deck_keeps_insertion_order() {
        let repo = InMemoryRepository::new();
        let deck = DeckId::new(1);
        for id in [3, 1, 2] {
            repo.upsert_card(&build_card(id, deck)).unwrap();
        }
        repo.upsert_card(&build_card(9, DeckId::new(2))).unwrap();
        // updating must not move a card
        repo.upsert_card(&build_card(3, deck)).unwrap();

        let ids: Vec<u64> = repo
            .cards_for_deck(deck)
            .unwrap()
            .iter()
            .map(|c| c.id().value())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(repo.cards_for_deck(DeckId::new(42)).unwrap().is_empty());
    }

    #[test]
    fn moving_card_between_decks_conflicts() {
        let repo = InMemoryRepository::new();
        repo.upsert_card(&build_card(1, DeckId::new(1))).unwrap();

        let err = repo.upsert_card(&build_card(1, DeckId::new(2))).unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(
            repo.get_card(CardId::new(1)).unwrap().unwrap().deck_id(),
            DeckId::new(1)
        );
    }

    #[test]
    fn get_cards_reports_missing_or_foreign_ids() {
        let repo = InMemoryRepository::new();
        repo.upsert_card(&build_card(1, DeckId::new(1))).unwrap();
        repo.upsert_card(&build_card(2, DeckId::new(2))).unwrap();

        let err = repo
            .get_cards(DeckId::new(1), &[CardId::new(1), CardId::new(2)])
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn decks_list_in_insertion_order() {
        let repo = InMemoryRepository::new();
        for id in [2, 1] {
            repo.upsert_deck(&build_deck(id)).unwrap();
        }
        repo.upsert_deck(&build_deck(2)).unwrap();

        let ids: Vec<u64> = repo
            .list_decks()
            .unwrap()
            .iter()
            .map(|d| d.id().value())
            .collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(repo.get_deck(DeckId::new(7)).unwrap().is_none());
    }

    #[test]
    fn storage_shares_one_backend() {
        let storage = Storage::in_memory();
        storage.decks.upsert_deck(&build_deck(1)).unwrap();
        storage.cards.upsert_card(&build_card(1, DeckId::new(1))).unwrap();

        assert_eq!(storage.decks.list_decks().unwrap().len(), 1);
        assert_eq!(storage.cards.cards_for_deck(DeckId::new(1)).unwrap().len(), 1);
    }
}
