//! The dealing deck.
//!
//! Cards are `rs_poker` cards end to end, since that is also the crate that
//! ranks them at showdown. This module owns what the evaluator does not:
//! building a full deck, shuffling it, drawing from it, and the two-glyph
//! card labels used in logs, snapshots, and tests.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
pub use rs_poker::core::Card;
use rs_poker::core::{Suit, Value};

const SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
const VALUES: [Value; 13] = [
    Value::Two,
    Value::Three,
    Value::Four,
    Value::Five,
    Value::Six,
    Value::Seven,
    Value::Eight,
    Value::Nine,
    Value::Ten,
    Value::Jack,
    Value::Queen,
    Value::King,
    Value::Ace,
];

// Indexed by Value discriminant (Two = 0 .. Ace = 12).
const VALUE_CHARS: [char; 13] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

/// Short label for a card, e.g. "A♠" or "7♦".
pub fn card_label(card: &Card) -> String {
    let suit = match card.suit {
        Suit::Club => '♣',
        Suit::Diamond => '♦',
        Suit::Heart => '♥',
        Suit::Spade => '♠',
    };
    format!("{}{}", VALUE_CHARS[card.value as usize], suit)
}

/// Parse a two-character tag like "Ah" or "Tc" into a card.
pub fn parse_card(tag: &str) -> Option<Card> {
    let mut chars = tag.chars();
    let value_char = chars.next()?.to_ascii_uppercase();
    let suit_char = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let value = VALUES[VALUE_CHARS.iter().position(|&c| c == value_char)?];
    let suit = match suit_char.to_ascii_lowercase() {
        'c' => Suit::Club,
        'd' => Suit::Diamond,
        'h' => Suit::Heart,
        's' => Suit::Spade,
        _ => return None,
    };
    Some(Card { value, suit })
}

/// A 52-card deck to shuffle and draw from.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// A full deck, one card per suit and value.
    pub fn new() -> Self {
        let cards = SUITS
            .iter()
            .flat_map(|&suit| VALUES.iter().map(move |&value| Card { value, suit }))
            .collect();
        Self { cards }
    }

    /// Fisher-Yates shuffle driven by a ChaCha20 RNG.
    pub fn shuffle(&mut self) {
        let mut rng = ChaCha20Rng::from_entropy();
        self.cards.shuffle(&mut rng);
    }

    /// Draw up to `count` cards off the top of the deck.
    pub fn draw(&mut self, count: usize) -> Vec<Card> {
        let take = count.min(self.cards.len());
        self.cards.split_off(self.cards.len() - take)
    }

    /// Cards left in the deck.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}
