//! Demo content for a hospitality English course: four decks, two of them
//! with starter cards.

use chrono::{DateTime, Utc};
use srs_core::model::{
    AudioClip, Card, CardBack, CardFront, CardId, Category, Deck, DeckId, Difficulty, MediaUri,
    SchedulingState, TagName,
};
use thiserror::Error;

use crate::repository::{Storage, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error(transparent)]
    Core(#[from] srs_core::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub const FRONT_DESK: DeckId = DeckId::new(1);
pub const FOOD_AND_BEVERAGE: DeckId = DeckId::new(2);
pub const HOUSEKEEPING: DeckId = DeckId::new(3);
pub const CULTURAL_COURTESY: DeckId = DeckId::new(4);

struct DeckSeed {
    id: DeckId,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    cover: &'static str,
}

struct KhmerSeed {
    term: &'static str,
    definition: &'static str,
    example: &'static str,
}

struct CardSeed {
    id: u64,
    deck: DeckId,
    term: &'static str,
    hint: &'static str,
    image: &'static str,
    audio_en: &'static str,
    audio_km: Option<&'static str>,
    definition: &'static str,
    example: &'static str,
    cultural_note: Option<&'static str>,
    khmer: Option<KhmerSeed>,
    category: &'static str,
    difficulty: u8,
    tags: &'static [&'static str],
    knowledge: u8,
}

const DECKS: &[DeckSeed] = &[
    DeckSeed {
        id: FRONT_DESK,
        name: "Front Desk Essentials",
        description: "Key terms for check-in, check-out, and guest inquiries.",
        category: "Front Desk",
        cover: "assets/decks/front-desk.jpg",
    },
    DeckSeed {
        id: FOOD_AND_BEVERAGE,
        name: "Food & Beverage Service",
        description: "Vocabulary for restaurant service, menu items, and dining etiquette.",
        category: "Food & Beverage",
        cover: "assets/decks/food-beverage.jpg",
    },
    DeckSeed {
        id: HOUSEKEEPING,
        name: "Housekeeping & Rooms",
        description: "Terms related to room amenities, cleaning, and guest requests.",
        category: "Housekeeping",
        cover: "assets/decks/housekeeping.jpg",
    },
    DeckSeed {
        id: CULTURAL_COURTESY,
        name: "Cultural Courtesy (Cambodia)",
        description: "Understanding Cambodian customs and etiquette for hospitality.",
        category: "Cultural Skills",
        cover: "assets/decks/culture.jpg",
    },
];

const CARDS: &[CardSeed] = &[
    CardSeed {
        id: 1,
        deck: FRONT_DESK,
        term: "Reservation",
        hint: "Booking a room in advance",
        image: "assets/flashcards/reservation.jpg",
        audio_en: "assets/audio/en/reservation.mp3",
        audio_km: Some("assets/audio/km/kar_kak_tuk.mp3"),
        definition: "An arrangement to have a room held for you at a hotel.",
        example: "Do you have a reservation with us?",
        cultural_note: Some(
            "In Cambodia, always confirm reservation details clearly, possibly via phone or email if online systems are unclear.",
        ),
        khmer: Some(KhmerSeed {
            term: "ការកក់ទុក",
            definition: "ការរៀបចំទុកបន្ទប់សម្រាប់អ្នកនៅសណ្ឋាគារ។",
            example: "តើលោក/អ្នកស្រីមានការកក់ទុកជាមួយយើងខ្ញុំដែរឬទេ?",
        }),
        category: "Check-in",
        difficulty: 1,
        tags: &["booking", "front-desk"],
        knowledge: 10,
    },
    CardSeed {
        id: 2,
        deck: FRONT_DESK,
        term: "Concierge",
        hint: "Hotel staff member who helps with special requests",
        image: "assets/flashcards/concierge.jpg",
        audio_en: "assets/audio/en/concierge.mp3",
        audio_km: Some("assets/audio/km/kon_siech.mp3"),
        definition: "A hotel employee whose job is to assist guests by arranging tours, making theater and restaurant reservations, etc.",
        example: "The concierge can help you book a tour to Angkor Wat.",
        cultural_note: Some(
            "Cambodian concierges are often very knowledgeable about local history and hidden gems.",
        ),
        khmer: Some(KhmerSeed {
            term: "អ្នកទទួលបន្ទុកព័ត៌មាន",
            definition: "បុគ្គលិកសណ្ឋាគារដែលមានតួនាទីជួយភ្ញៀវដោយរៀបចំដំណើរកម្សាន្ត កក់សំបុត្រមហោស្រពនិងភោជនីយដ្ឋាន។ល។",
            example: "អ្នកទទួលបន្ទុកព័ត៌មានអាចជួយលោក/អ្នកស្រីកក់ដំណើរកម្សាន្តទៅអង្គរវត្តបាន។",
        }),
        category: "Guest Services",
        difficulty: 2,
        tags: &["services", "assistance"],
        knowledge: 5,
    },
    CardSeed {
        id: 3,
        deck: FRONT_DESK,
        term: "Amenities",
        hint: "Extra services or facilities",
        image: "assets/flashcards/amenities.jpg",
        audio_en: "assets/audio/en/amenities.mp3",
        audio_km: Some("assets/audio/km/kroeung_borikha.mp3"),
        definition: "Desirable or useful features or facilities of a building or place.",
        example: "Our hotel offers a wide range of amenities, including a pool and gym.",
        cultural_note: None,
        khmer: Some(KhmerSeed {
            term: "គ្រឿងបរិក្ខារ",
            definition: "លក្ខណៈពិសេសឬគ្រឿងបរិក្ខារដែលចង់បានឬមានប្រយោជន៍នៃអគារឬទីកន្លែង។",
            example: "សណ្ឋាគាររបស់យើងផ្តល់ជូនគ្រឿងបរិក្ខារជាច្រើន រួមទាំងអាងហែលទឹកនិងកន្លែងហាត់ប្រាណ។",
        }),
        category: "Hotel Information",
        difficulty: 2,
        tags: &["facilities", "services"],
        knowledge: 15,
    },
    CardSeed {
        id: 4,
        deck: FRONT_DESK,
        term: "Invoice",
        hint: "Bill for services",
        image: "assets/flashcards/invoice.jpg",
        audio_en: "assets/audio/en/invoice.mp3",
        audio_km: Some("assets/audio/km/vikayabat.mp3"),
        definition: "A list of goods sent or services provided, with a statement of the sum due for these; a bill.",
        example: "Please review your invoice before checking out.",
        cultural_note: None,
        khmer: Some(KhmerSeed {
            term: "វិក្កយបត្រ",
            definition: "បញ្ជីទំនិញដែលបានផ្ញើឬសេវាកម្មដែលបានផ្តល់ ជាមួយនឹងការបញ្ជាក់ពីចំនួនទឹកប្រាក់ដែលត្រូវបង់សម្រាប់ទំនិញឬសេវាកម្មទាំងនេះ; វិក្កយបត្រ។",
            example: "សូមពិនិត្យមើលវិក្កយបត្ររបស់លោក/អ្នកស្រីមុនពេលចុះឈ្មោះចេញ។",
        }),
        category: "Check-out",
        difficulty: 1,
        tags: &["billing", "payment"],
        knowledge: 8,
    },
    CardSeed {
        id: 5,
        deck: FRONT_DESK,
        term: "Wake-up call",
        hint: "Phone call to wake a guest",
        image: "assets/flashcards/wakeupcall.jpg",
        audio_en: "assets/audio/en/wakeup_call.mp3",
        audio_km: Some("assets/audio/km/kar_hao_das.mp3"),
        definition: "A telephone call made to a hotel guest at a requested time to wake them up.",
        example: "I would like to request a wake-up call for 6 AM tomorrow.",
        cultural_note: None,
        khmer: Some(KhmerSeed {
            term: "ការហៅដាស់",
            definition: "ការហៅទូរស័ព្ទទៅកាន់ភ្ញៀវសណ្ឋាគារតាមពេលវេលាដែលបានស្នើសុំដើម្បីដាស់ពួកគេ។",
            example: "ខ្ញុំចង់ស្នើសុំការហៅដាស់នៅម៉ោង ៦ ព្រឹកថ្ងៃស្អែក។",
        }),
        category: "Guest Services",
        difficulty: 1,
        tags: &["requests", "morning"],
        knowledge: 12,
    },
    CardSeed {
        id: 6,
        deck: FOOD_AND_BEVERAGE,
        term: "Table d'hôte",
        hint: "Fixed price menu",
        image: "assets/flashcards/tabledhote.jpg",
        audio_en: "assets/audio/en/table_dhote.mp3",
        audio_km: None,
        definition: "A multi-course meal charged at a fixed price.",
        example: "Our restaurant offers a daily table d'hôte menu for $25.",
        cultural_note: Some(
            "Set menus are common in Cambodian tourist restaurants, often featuring popular local dishes.",
        ),
        khmer: None,
        category: "Dining",
        difficulty: 3,
        tags: &["menu", "pricing"],
        knowledge: 2,
    },
    CardSeed {
        id: 7,
        deck: FOOD_AND_BEVERAGE,
        term: "Sommelier",
        hint: "Wine expert",
        image: "assets/flashcards/sommelier.jpg",
        audio_en: "assets/audio/en/sommelier.mp3",
        audio_km: None,
        definition: "A wine steward, typically in a fine dining restaurant.",
        example: "Our sommelier can recommend the perfect wine to accompany your meal.",
        cultural_note: None,
        khmer: None,
        category: "Fine Dining",
        difficulty: 4,
        tags: &["wine", "staff"],
        knowledge: 1,
    },
];

fn build_deck(seed: &DeckSeed, now: DateTime<Utc>) -> Result<Deck, srs_core::Error> {
    Ok(Deck::new(seed.id, seed.name, Some(seed.description.to_owned()), now)?
        .with_category(Category::new(seed.category)?)
        .with_cover_image(MediaUri::from_file(seed.cover)?))
}

fn build_card(seed: &CardSeed, now: DateTime<Utc>) -> Result<Card, srs_core::Error> {
    let mut front = CardFront::new(seed.term)?
        .with_hint(seed.hint)
        .with_image(MediaUri::from_file(seed.image)?)
        .with_audio(AudioClip::new("en", MediaUri::from_file(seed.audio_en)?)?);
    if let Some(path) = seed.audio_km {
        front = front.with_audio(AudioClip::new("km", MediaUri::from_file(path)?)?);
    }

    let mut back = CardBack::new(seed.definition)?.with_example(seed.example);
    if let Some(note) = seed.cultural_note {
        back = back.with_cultural_note(note);
    }
    if let Some(km) = &seed.khmer {
        front = front.with_translation(km.term);
        back = back
            .with_definition_translation(km.definition)
            .with_example_translation(km.example);
    }

    let tags = seed
        .tags
        .iter()
        .map(|t| TagName::new(*t))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Card::new(CardId::new(seed.id), seed.deck, front, back, now)
        .with_category(Category::new(seed.category)?)
        .with_tags(tags)
        .with_difficulty(Difficulty::new(seed.difficulty)?)
        .with_scheduling(SchedulingState::new(now).with_knowledge_level(seed.knowledge)?))
}

/// Counts of what `seed_demo` wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub decks: usize,
    pub cards: usize,
}

/// Write the demo decks and cards into `storage`, all due at `now`.
///
/// Re-seeding overwrites the demo records with fresh scheduling state.
///
/// # Errors
///
/// Returns `SeedError::Storage` if a write fails.
pub fn seed_demo(storage: &Storage, now: DateTime<Utc>) -> Result<SeedSummary, SeedError> {
    for seed in DECKS {
        storage.decks.upsert_deck(&build_deck(seed, now)?)?;
    }
    for seed in CARDS {
        storage.cards.upsert_card(&build_card(seed, now)?)?;
    }
    Ok(SeedSummary {
        decks: DECKS.len(),
        cards: CARDS.len(),
    })
}

/// A fresh in-memory `Storage` populated with the demo content.
///
/// # Errors
///
/// Same as [`seed_demo`].
pub fn demo_storage(now: DateTime<Utc>) -> Result<Storage, SeedError> {
    let storage = Storage::in_memory();
    seed_demo(&storage, now)?;
    Ok(storage)
}
