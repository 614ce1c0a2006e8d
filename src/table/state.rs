//! Read-only views of a table and its current hand, for status displays
//! and wire transports.

use super::hand::Hand;
use super::Table;
use crate::deck::card_label;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SeatSnapshot {
    pub name: String,
    pub funds: i64,
    pub bet_amount: i64,
    pub playing: bool,
    pub all_in: bool,
    pub folded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PotSnapshot {
    pub chips: i64,
    pub eligible: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HandSnapshot {
    /// Board cards as display labels, e.g. "A♠".
    pub board: Vec<String>,
    /// Side pots in the order they were carved, then the main pot.
    pub pots: Vec<PotSnapshot>,
    pub current_bet: Option<i64>,
    pub bet_turn: Option<String>,
    pub first_to_bet: Option<String>,
    pub betting_done: bool,
    pub hand_done: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub seats: Vec<Option<SeatSnapshot>>,
    pub dealer_index: usize,
    pub playing: bool,
    pub hand: Option<HandSnapshot>,
}

impl Table {
    /// A point-in-time view of the seats, the dealer button, and the hand
    /// in progress.
    pub fn snapshot(&self) -> TableSnapshot {
        let (seats, dealer_index) = {
            let seats = self.read_seats();
            let view: Vec<Option<SeatSnapshot>> = seats
                .seats
                .iter()
                .map(|slot| {
                    slot.as_ref().map(|player| {
                        let state = player.state();
                        SeatSnapshot {
                            name: player.name().to_string(),
                            funds: state.funds,
                            bet_amount: state.bet_amount,
                            playing: state.playing,
                            all_in: state.all_in,
                            folded: state.folded,
                        }
                    })
                })
                .collect();
            (view, seats.dealer_index)
        };
        let hand = self.lock_hand().as_ref().map(Hand::snapshot);
        TableSnapshot {
            seats,
            dealer_index,
            playing: self.is_playing(),
            hand,
        }
    }
}

impl Hand {
    pub(crate) fn snapshot(&self) -> HandSnapshot {
        HandSnapshot {
            board: self.board.iter().map(card_label).collect(),
            pots: self
                .pot
                .iter()
                .map(|pot| PotSnapshot {
                    chips: pot.chips(),
                    eligible: self
                        .players
                        .iter()
                        .filter(|(_, player)| pot.is_eligible(player.id()))
                        .map(|(_, player)| player.name().to_string())
                        .collect(),
                })
                .collect(),
            current_bet: self.current_bet(),
            bet_turn: self
                .round
                .as_ref()
                .map(|round| self.players.get(round.bet_turn).name().to_string()),
            first_to_bet: self
                .first_to_bet
                .map(|slot| self.players.get(slot).name().to_string()),
            betting_done: self.betting_done,
            hand_done: self.hand_done,
        }
    }
}
