//! Typed view of the card deck the model is asked to produce.
//!
//! The relay forwards model output as-is. These types are only used when
//! deck validation is switched on, to check the shape at the boundary.

use serde::Deserialize;
use thiserror::Error;

pub const DECK_SIZE: usize = 6;
const PER_KIND: usize = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct CardDeck {
    pub category: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Card {
    Youtube {
        slot: u8,
        title: String,
        subtitle: String,
        #[serde(rename = "searchQuery")]
        search_query: String,
    },
    Offer {
        slot: u8,
        title: String,
        subtitle: String,
        #[serde(rename = "searchQuery")]
        search_query: String,
        price: String,
    },
    Song {
        slot: u8,
        title: String,
        artist: String,
    },
}

impl Card {
    pub fn slot(&self) -> u8 {
        match self {
            Card::Youtube { slot, .. } | Card::Offer { slot, .. } | Card::Song { slot, .. } => {
                *slot
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Card::Youtube { .. } => "youtube",
            Card::Offer { .. } => "offer",
            Card::Song { .. } => "song",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("deck does not match the card schema: {0}")]
    Shape(String),

    #[error("expected 6 cards, got {0}")]
    Count(usize),

    #[error("slot {0} is out of range or repeated")]
    Slot(u8),

    #[error("expected 2 {kind} cards, got {got}")]
    Mix { kind: &'static str, got: usize },

    #[error("category is empty")]
    Category,
}

impl CardDeck {
    /// Parses and checks a model reply against the six-card contract.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CardError> {
        let deck: CardDeck =
            serde_json::from_value(value.clone()).map_err(|e| CardError::Shape(e.to_string()))?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.category.trim().is_empty() {
            return Err(CardError::Category);
        }
        if self.cards.len() != DECK_SIZE {
            return Err(CardError::Count(self.cards.len()));
        }

        let mut seen = [false; DECK_SIZE];
        for card in &self.cards {
            let slot = card.slot();
            let idx = usize::from(slot).wrapping_sub(1);
            match seen.get_mut(idx) {
                Some(taken) if !*taken => *taken = true,
                _ => return Err(CardError::Slot(slot)),
            }
        }

        for kind in ["youtube", "offer", "song"] {
            let got = self.cards.iter().filter(|c| c.kind() == kind).count();
            if got != PER_KIND {
                return Err(CardError::Mix { kind, got });
            }
        }
        Ok(())
    }
}
