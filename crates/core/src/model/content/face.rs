use crate::model::CardId;
use crate::model::content::media::{AudioClip, MediaUri};
use crate::model::content::text::{DefinitionText, TermText, TextError};

//
// ─── HELPERS ───────────────────────────────────────────────────────────────────
//

fn non_blank(s: impl Into<String>) -> Option<String> {
    let s = s.into();
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

//
// ─── FRONT ─────────────────────────────────────────────────────────────────────
//

/// Prompt side of a flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFront {
    term: TermText,
    translation: Option<String>,
    hint: Option<String>,
    image: Option<MediaUri>,
    audio: Vec<AudioClip>,
}

impl CardFront {
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the term is blank.
    pub fn new(term: impl Into<String>) -> Result<Self, TextError> {
        Ok(Self {
            term: TermText::parse(term)?,
            translation: None,
            hint: None,
            image: None,
            audio: Vec::new(),
        })
    }

    /// Blank translations are dropped.
    #[must_use]
    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = non_blank(translation);
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = non_blank(hint);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: MediaUri) -> Self {
        self.image = Some(image);
        self
    }

    #[must_use]
    pub fn with_audio(mut self, clip: AudioClip) -> Self {
        self.audio.push(clip);
        self
    }

    #[must_use]
    pub fn term(&self) -> &str {
        self.term.as_str()
    }

    #[must_use]
    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn image(&self) -> Option<&MediaUri> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn audio(&self) -> &[AudioClip] {
        &self.audio
    }

    /// First audio clip recorded for the given language tag.
    #[must_use]
    pub fn audio_for(&self, language: &str) -> Option<&AudioClip> {
        self.audio
            .iter()
            .find(|clip| clip.language().eq_ignore_ascii_case(language))
    }
}

//
// ─── BACK ──────────────────────────────────────────────────────────────────────
//

/// Answer side of a flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardBack {
    definition: DefinitionText,
    definition_translation: Option<String>,
    example: Option<String>,
    example_translation: Option<String>,
    cultural_note: Option<String>,
    related: Vec<CardId>,
}

impl CardBack {
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the definition is blank.
    pub fn new(definition: impl Into<String>) -> Result<Self, TextError> {
        Ok(Self {
            definition: DefinitionText::parse(definition)?,
            definition_translation: None,
            example: None,
            example_translation: None,
            cultural_note: None,
            related: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_definition_translation(mut self, translation: impl Into<String>) -> Self {
        self.definition_translation = non_blank(translation);
        self
    }

    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = non_blank(example);
        self
    }

    #[must_use]
    pub fn with_example_translation(mut self, translation: impl Into<String>) -> Self {
        self.example_translation = non_blank(translation);
        self
    }

    #[must_use]
    pub fn with_cultural_note(mut self, note: impl Into<String>) -> Self {
        self.cultural_note = non_blank(note);
        self
    }

    #[must_use]
    pub fn with_related(mut self, related: impl IntoIterator<Item = CardId>) -> Self {
        self.related.extend(related);
        self
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        self.definition.as_str()
    }

    #[must_use]
    pub fn definition_translation(&self) -> Option<&str> {
        self.definition_translation.as_deref()
    }

    #[must_use]
    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    #[must_use]
    pub fn example_translation(&self) -> Option<&str> {
        self.example_translation.as_deref()
    }

    #[must_use]
    pub fn cultural_note(&self) -> Option<&str> {
        self.cultural_note.as_deref()
    }

    #[must_use]
    pub fn related(&self) -> &[CardId] {
        &self.related
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_term_is_rejected() {
        assert_eq!(CardFront::new("  ").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn blank_definition_is_rejected() {
        assert_eq!(CardBack::new("").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn optional_fields_drop_blank_values() {
        let front = CardFront::new("Reservation")
            .unwrap()
            .with_translation("   ")
            .with_hint("Booking a room in advance");

        assert_eq!(front.term(), "Reservation");
        assert_eq!(front.translation(), None);
        assert_eq!(front.hint(), Some("Booking a room in advance"));
    }

    #[test]
    fn audio_lookup_by_language() {
        let en = AudioClip::new("en", MediaUri::from_file("en/reservation.mp3").unwrap()).unwrap();
        let km = AudioClip::new("km", MediaUri::from_file("km/kar_kak_tuk.mp3").unwrap()).unwrap();
        let front = CardFront::new("Reservation")
            .unwrap()
            .with_audio(en)
            .with_audio(km.clone());

        assert_eq!(front.audio().len(), 2);
        assert_eq!(front.audio_for("KM"), Some(&km));
        assert!(front.audio_for("fr").is_none());
    }

    #[test]
    fn back_keeps_related_cards_in_order() {
        let back = CardBack::new("A wine steward.")
            .unwrap()
            .with_example("Our sommelier can recommend a wine.")
            .with_related([CardId::new(7), CardId::new(3)]);

        assert_eq!(back.related(), &[CardId::new(7), CardId::new(3)]);
        assert_eq!(back.example(), Some("Our sommelier can recommend a wine."));
        assert!(back.cultural_note().is_none());
    }
}
