//! Showdown hand strength: the best five cards pickable from a player's
//! hole cards and the board.

use crate::deck::Card;
use rs_poker::core::{Hand, Rank, Rankable};

/// The nine hand categories, weakest first, so the derived ordering is the
/// poker ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandCategory {
    pub fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::Pair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

/// How strong a showdown hand is: category first, then the kicker encoding
/// within the category. Greater is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank {
    category: HandCategory,
    kickers: u32,
}

impl HandRank {
    fn of(five: Vec<Card>) -> Self {
        let (category, kickers) = match Hand::new_with_cards(five).rank() {
            Rank::HighCard(k) => (HandCategory::HighCard, k),
            Rank::OnePair(k) => (HandCategory::Pair, k),
            Rank::TwoPair(k) => (HandCategory::TwoPair, k),
            Rank::ThreeOfAKind(k) => (HandCategory::ThreeOfAKind, k),
            Rank::Straight(k) => (HandCategory::Straight, k),
            Rank::Flush(k) => (HandCategory::Flush, k),
            Rank::FullHouse(k) => (HandCategory::FullHouse, k),
            Rank::FourOfAKind(k) => (HandCategory::FourOfAKind, k),
            Rank::StraightFlush(k) => (HandCategory::StraightFlush, k),
        };
        Self { category, kickers }
    }

    pub fn category(&self) -> HandCategory {
        self.category
    }

    pub fn description(&self) -> &'static str {
        self.category.name()
    }
}

/// Evaluate the best five-card hand out of hole cards plus board. Every
/// five-card subset is tried by bitmask; seven cards is 21 subsets, not
/// worth anything cleverer.
pub fn evaluate_hand(hole_cards: &[Card], board: &[Card]) -> HandRank {
    let cards: Vec<Card> = hole_cards.iter().chain(board.iter()).copied().collect();
    if cards.len() <= 5 {
        return HandRank::of(cards);
    }

    let mut best: Option<HandRank> = None;
    for mask in 0u32..(1 << cards.len()) {
        if mask.count_ones() != 5 {
            continue;
        }
        let five: Vec<Card> = cards
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &card)| card)
            .collect();
        let rank = HandRank::of(five);
        if best.map_or(true, |b| rank > b) {
            best = Some(rank);
        }
    }
    best.unwrap_or(HandRank {
        category: HandCategory::HighCard,
        kickers: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::parse_card;

    fn cards(tags: &[&str]) -> Vec<Card> {
        tags.iter()
            .map(|tag| parse_card(tag).expect("valid card tag"))
            .collect()
    }

    #[test]
    fn test_wheel_straight_flush() {
        let rank = evaluate_hand(&cards(&["Ad", "2d"]), &cards(&["3d", "4d", "5d"]));
        assert_eq!(rank.category(), HandCategory::StraightFlush);
    }

    #[test]
    fn test_two_pair_out_of_seven() {
        let rank = evaluate_hand(
            &cards(&["Qh", "8c"]),
            &cards(&["Qs", "8d", "2c", "5h", "Kd"]),
        );
        assert_eq!(rank.category(), HandCategory::TwoPair);
    }

    #[test]
    fn test_board_flush_outranks_the_hole_pair() {
        let rank = evaluate_hand(
            &cards(&["2c", "2d"]),
            &cards(&["4h", "7h", "9h", "Jh", "Kh"]),
        );
        assert_eq!(rank.category(), HandCategory::Flush);
    }

    #[test]
    fn test_kickers_order_within_a_category() {
        let board = cards(&["9c", "9d", "5h", "7s", "2c"]);
        let ace_kicker = evaluate_hand(&cards(&["Ah", "3d"]), &board);
        let king_kicker = evaluate_hand(&cards(&["Kh", "3c"]), &board);

        assert_eq!(ace_kicker.category(), king_kicker.category());
        assert!(ace_kicker > king_kicker);
    }

    #[test]
    fn test_full_house_beats_flush() {
        let full_house = evaluate_hand(&cards(&["8c", "8d"]), &cards(&["8h", "Kc", "Kd"]));
        let flush = evaluate_hand(&cards(&["Ah", "Th"]), &cards(&["2h", "6h", "9h"]));
        assert_eq!(full_house.category(), HandCategory::FullHouse);
        assert_eq!(flush.category(), HandCategory::Flush);
        assert!(full_house > flush);
    }

    #[test]
    fn test_wheel_is_the_weakest_straight() {
        let wheel = evaluate_hand(&cards(&["Ac", "2d"]), &cards(&["3h", "4s", "5c"]));
        let six_high = evaluate_hand(&cards(&["2h", "3s"]), &cards(&["4c", "5d", "6h"]));
        assert_eq!(wheel.category(), HandCategory::Straight);
        assert_eq!(six_high.category(), HandCategory::Straight);
        assert!(six_high > wheel);
    }
}
