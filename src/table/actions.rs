use super::hand::Hand;
use crate::error::{TableError, TableResult};
use crate::player::{Action, Player};
use std::sync::Arc;

impl Hand {
    /// Validate and apply one action from the player whose turn it is,
    /// then move the turn along.
    pub(crate) fn player_action(
        &mut self,
        player: &Arc<Player>,
        action: Action,
    ) -> TableResult<()> {
        {
            let round = self.round.as_ref().ok_or(TableError::NoRound)?;
            if round.round_done || self.players.get(round.bet_turn).id() != player.id() {
                return Err(TableError::NotYourTurn);
            }
        }

        match action {
            Action::Call => {
                let current_bet = self.round.as_ref().ok_or(TableError::NoRound)?.current_bet;
                self.player_bet(player, current_bet)?;
            }
            Action::Raise(bet) => {
                self.player_bet(player, bet)?;
            }
            Action::AllIn(bet) => {
                let (funds, bet_amount) = {
                    let state = player.state();
                    (state.funds, state.bet_amount)
                };
                if funds != bet - bet_amount {
                    return Err(TableError::NotAllIn { funds, bet });
                }
                self.player_bet(player, bet)?;
            }
            Action::Fold => self.player_fold(),
        }

        tracing::debug!(player = %player.name(), ?action, "action accepted");
        self.advance_to_next_better();

        // A folded opener cleared the anchor; whoever acts next closes the
        // round when the walk comes back around to them.
        if self.first_to_bet.is_none() {
            if let Some(round) = self.round.as_ref() {
                if !round.round_done {
                    self.first_to_bet = Some(round.bet_turn);
                }
            }
        }
        Ok(())
    }

    /// Commit the player to `bet` total chips on this street.
    fn player_bet(&mut self, player: &Arc<Player>, bet: i64) -> TableResult<()> {
        let (funds, bet_amount) = {
            let state = player.state();
            (state.funds, state.bet_amount)
        };
        let round = self.round.as_mut().ok_or(TableError::NoRound)?;
        let all_in = bet == funds + bet_amount;
        let raise = bet > round.current_bet;

        if bet - bet_amount > funds {
            return Err(TableError::InsufficientFunds {
                required: bet - bet_amount,
                available: funds,
            });
        }
        if bet < round.current_bet && !all_in {
            return Err(TableError::InsufficientBet {
                bet,
                current_bet: round.current_bet,
            });
        }
        if raise {
            if bet - round.current_bet < self.config.min_bet {
                return Err(TableError::RaiseTooSmall {
                    min_raise: self.config.min_bet,
                    attempted: bet - round.current_bet,
                });
            }
            // Betting reopens: every remaining better must act again.
            round.current_bet = bet;
            self.first_to_bet = Some(round.bet_turn);
            tracing::debug!(player = %player.name(), bet, "raise reopens the betting");
        }

        {
            let mut state = player.state();
            state.funds -= bet - state.bet_amount;
            state.bet_amount = bet;
            if all_in {
                state.all_in = true;
            }
        }

        if all_in {
            tracing::debug!(player = %player.name(), bet, "player is all in");
            if self.better_count() == 0 {
                self.betting_done = true;
                tracing::debug!("all in ended the betting");
            }
        }
        Ok(())
    }

    /// Fold the current better: their street bet is forfeited to the main
    /// pot, they lose all pot eligibility, and they leave the ring.
    fn player_fold(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let slot = round.bet_turn;
        let player = self.players.get(slot).clone();

        let forfeited = {
            let mut state = player.state();
            state.hole_cards.clear();
            state.folded = true;
            let bet = state.bet_amount;
            state.bet_amount = 0;
            bet
        };
        self.pot.add_to_main(forfeited);
        self.pot.remove_player(player.id());

        if self.first_to_bet == Some(slot) {
            // The opener is gone; the anchor is re-established on whoever
            // acts next, once the turn has advanced.
            self.first_to_bet = None;
        }
        round.bet_turn = self.players.prev(slot);
        self.players.remove(slot);
        tracing::debug!(player = %player.name(), forfeited, "player folded");

        if self.players.len() == 1 {
            self.hand_done = true;
            if let Some(round) = self.round.as_mut() {
                round.round_done = true;
            }
            tracing::debug!("fold ended the hand");
        } else if self.better_count() <= 1 {
            self.betting_done = true;
            tracing::debug!("fold ended the betting");
        }
    }

    /// Walk the ring from the slot past `bet_turn`, skipping all-in
    /// players, until a better is found or the walk returns to the
    /// opener's slot. The walk crosses unlinked slots so a folded opener
    /// still closes the round at its old position.
    pub(crate) fn advance_to_next_better(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.round_done {
            tracing::debug!("skipping better advance, round is done");
            return;
        }
        let capacity = self.players.capacity();
        let mut slot = round.bet_turn;
        for _ in 0..capacity {
            slot = (slot + 1) % capacity;
            if self.first_to_bet == Some(slot) {
                break;
            }
            if !self.players.is_live(slot) {
                continue;
            }
            let player = self.players.get(slot);
            if !player.is_all_in() {
                tracing::debug!(better = %player.name(), "found next better");
                round.bet_turn = slot;
                return;
            }
        }
        round.round_done = true;
        tracing::debug!("round of betting is done");
    }
}
