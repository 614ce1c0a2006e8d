//! The main pot, side pots, and the street-close collection that builds them.

use crate::player::{Player, PlayerId};
use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

/// One pot: the chips in it and the players who may win it.
#[derive(Debug, Clone)]
pub struct SubPot {
    pub(crate) eligible: HashSet<PlayerId>,
    pub(crate) chips: i64,
}

impl SubPot {
    pub(crate) fn new(eligible: HashSet<PlayerId>) -> Self {
        Self { eligible, chips: 0 }
    }

    pub(crate) fn empty() -> Self {
        Self::new(HashSet::new())
    }

    pub fn chips(&self) -> i64 {
        self.chips
    }

    pub fn is_eligible(&self, id: PlayerId) -> bool {
        self.eligible.contains(&id)
    }
}

/// The current main pot plus the side pots carved below it, in the order
/// they were carved.
#[derive(Debug, Clone)]
pub struct Pot {
    pub(crate) main: SubPot,
    pub(crate) side_pots: Vec<SubPot>,
}

impl Pot {
    /// A fresh pot where every admitted participant is eligible.
    pub(crate) fn new(eligible: HashSet<PlayerId>) -> Self {
        Self {
            main: SubPot::new(eligible),
            side_pots: Vec::new(),
        }
    }

    /// Total chips across the main pot and every side pot.
    pub fn total(&self) -> i64 {
        self.main.chips + self.side_pots.iter().map(|p| p.chips).sum::<i64>()
    }

    /// A folded player's street bet is forfeited into the main pot.
    pub(crate) fn add_to_main(&mut self, chips: i64) {
        self.main.chips += chips;
    }

    /// Strip a player from every eligibility set. Eligibility only ever
    /// shrinks; a fold can never re-enter a pot.
    pub(crate) fn remove_player(&mut self, id: PlayerId) {
        self.main.eligible.remove(&id);
        for pot in &mut self.side_pots {
            pot.eligible.remove(&id);
        }
    }

    /// Pots in distribution order: side pots as carved, main pot last.
    pub fn iter(&self) -> impl Iterator<Item = &SubPot> {
        self.side_pots.iter().chain(std::iter::once(&self.main))
    }

    /// Close out a street: move every live participant's street bet into
    /// the pot structure, carving a side pot at each short all-in level.
    ///
    /// Walking contributors in ascending bet order, a player short of the
    /// ceiling freezes the working main pot at their level: it absorbs a
    /// matching amount from every higher-committed player, and a fresh main
    /// pot opens for the remainder above.
    pub(crate) fn collect_street(&mut self, players: &[Arc<Player>], current_bet: i64) {
        if current_bet == 0 {
            return;
        }

        let mut contributors: Vec<(Arc<Player>, i64)> = players
            .iter()
            .filter_map(|p| {
                let bet = p.state().bet_amount;
                if bet > 0 {
                    Some((p.clone(), bet))
                } else {
                    None
                }
            })
            .collect();
        contributors.sort_by_key(|(_, bet)| *bet);

        let mut ceiling = current_bet;
        for i in 0..contributors.len() {
            let (player, bet) = contributors[i].clone();
            if bet < ceiling {
                self.main.chips += bet;
                self.main.eligible.insert(player.id());
                for (other, other_bet) in contributors[i + 1..].iter_mut() {
                    *other_bet -= bet;
                    self.main.chips += bet;
                    self.main.eligible.insert(other.id());
                }
                let frozen = mem::replace(&mut self.main, SubPot::empty());
                tracing::debug!(
                    level = bet,
                    chips = frozen.chips,
                    "carved side pot at all-in level"
                );
                self.side_pots.push(frozen);
                ceiling = current_bet - bet;
            } else {
                self.main.chips += bet;
                self.main.eligible.insert(player.id());
            }
        }

        for (player, _) in &contributors {
            player.state().bet_amount = 0;
        }
    }
}
