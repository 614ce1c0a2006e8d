use super::hand::Hand;
use crate::error::{TableError, TableResult};
use crate::eval::{evaluate_hand, HandRank};
use crate::player::{Player, Signal};
use std::sync::Arc;

impl Hand {
    /// Close out the street's money: everyone's bet moves into the pot
    /// structure, carving side pots wherever an all-in came up short.
    pub(crate) fn create_pots(&mut self) {
        let current_bet = self.current_bet().unwrap_or(0);
        if current_bet == 0 {
            return;
        }
        let players: Vec<Arc<Player>> =
            self.players.iter().map(|(_, p)| p.clone()).collect();
        self.pot.collect_street(&players, current_bet);
        if let Some(round) = self.round.as_mut() {
            round.current_bet = 0;
        }
    }

    /// Rank the survivors, pay out every pot, and clear the hand off the
    /// participants. Fails without touching anything if betting or dealing
    /// is still in progress.
    pub(crate) fn finish_hand(&mut self) -> TableResult<()> {
        if !self.round_done() || !self.hand_done {
            return Err(TableError::TableCurrentlyBetting);
        }
        tracing::info!(total = self.pot.total(), "distributing pots");
        let ranking = self.player_ranking();
        self.distribute_pots(&ranking);

        for (_, player) in self.players.iter() {
            let mut state = player.state();
            state.hole_cards.clear();
            state.playing = false;
            state.all_in = false;
            state.folded = false;
            state.hand_rank = None;
        }
        self.board.clear();
        self.broadcast(Signal::HandFinished);
        Ok(())
    }

    /// Survivors grouped into tied equivalence classes, best hand first.
    /// A lone survivor wins outright without an evaluation.
    fn player_ranking(&self) -> Vec<Vec<Arc<Player>>> {
        if let Some(player) = self.players.solo() {
            return vec![vec![player.clone()]];
        }

        let mut ranked: Vec<(Arc<Player>, HandRank)> = self
            .players
            .iter()
            .map(|(_, player)| {
                let hole = player.hole_cards();
                let rank = evaluate_hand(&hole, &self.board);
                tracing::debug!(
                    player = %player.name(),
                    hand = rank.description(),
                    "evaluated hand"
                );
                player.state().hand_rank = Some(rank);
                (player.clone(), rank)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut classes: Vec<Vec<Arc<Player>>> = Vec::new();
        let mut last_rank: Option<HandRank> = None;
        for (player, rank) in ranked {
            if last_rank == Some(rank) {
                if let Some(class) = classes.last_mut() {
                    class.push(player);
                }
            } else {
                classes.push(vec![player]);
            }
            last_rank = Some(rank);
        }
        classes
    }

    /// Pay each pot to the best-ranked class intersecting its eligibility:
    /// side pots in the order they were carved, then the main pot. Splits
    /// divide evenly with the odd chips going to the last winner.
    fn distribute_pots(&self, ranking: &[Vec<Arc<Player>>]) {
        for pot in self.pot.iter() {
            if pot.chips() == 0 {
                continue;
            }
            let winners = ranking.iter().find_map(|class| {
                let eligible: Vec<&Arc<Player>> = class
                    .iter()
                    .filter(|player| pot.is_eligible(player.id()))
                    .collect();
                if eligible.is_empty() {
                    None
                } else {
                    Some(eligible)
                }
            });
            let winners = match winners {
                Some(winners) => winners,
                None => {
                    debug_assert!(false, "pot with chips but no eligible winner");
                    tracing::error!(chips = pot.chips(), "pot had no eligible winner");
                    continue;
                }
            };

            let share = pot.chips() / winners.len() as i64;
            let mut remaining = pot.chips();
            for (i, winner) in winners.iter().enumerate() {
                let amount = if i == winners.len() - 1 {
                    remaining
                } else {
                    share
                };
                winner.state().funds += amount;
                remaining -= amount;
                tracing::info!(winner = %winner.name(), amount, "pot awarded");
            }
        }
    }
}
