use super::Table;
use crate::constants::BOARD_SIZE;
use crate::error::{TableError, TableResult};
use crate::player::{Action, Signal};
use tokio::time::{sleep, timeout_at, Instant};

impl Table {
    /// Play hands at this table until it can no longer continue: too few
    /// funded players remain, or no dealer can be found. Blocks for the
    /// life of the table; players drive it through their action inboxes.
    pub async fn play(&self) -> TableResult<()> {
        if self.swap_playing(true) {
            return Err(TableError::TableAlreadyPlaying);
        }
        let result = self.play_loop().await;
        if let Err(e) = &result {
            tracing::info!(error = %e, "table stopped playing");
        }
        self.set_playing(false);
        result
    }

    async fn play_loop(&self) -> TableResult<()> {
        loop {
            let mut hand = self.new_hand()?;
            hand.start_hand()?;
            tracing::info!(dealer = %hand.dealer().name(), "dealing next hand");
            *self.lock_hand() = Some(hand);

            self.listen_for_actions().await;
            while !self.hand_done() {
                self.deal_street()?;
                self.listen_for_actions().await;
                self.finish_board_if_complete();
            }
            self.finish_current_hand()?;

            sleep(self.config.inter_hand_delay).await;
            self.stand_up_finished_players();
            self.increment_dealer_index()?;
        }
    }

    /// Collect one action per turn until the street's betting is over. A
    /// turn that outlives the configured timeout folds; a rejected action
    /// only burns the clock it already spent.
    async fn listen_for_actions(&self) {
        loop {
            let turn = {
                let guard = self.lock_hand();
                match guard.as_ref() {
                    Some(hand)
                        if !hand.round_done() && !hand.betting_done && !hand.hand_done =>
                    {
                        hand.current_better().map(|player| {
                            hand.broadcast(Signal::TurnStarted {
                                player: player.name().to_string(),
                                current_bet: hand.current_bet().unwrap_or(0),
                            });
                            player
                        })
                    }
                    _ => None,
                }
            };
            let Some(player) = turn else { break };

            tracing::debug!(player = %player.name(), "waiting for action");
            let deadline = Instant::now() + self.config.turn_timeout;
            loop {
                let action = match timeout_at(deadline, player.next_action()).await {
                    Ok(Some(action)) => action,
                    Ok(None) => Action::Fold,
                    Err(_) => {
                        tracing::info!(player = %player.name(), "timed out, folding");
                        Action::Fold
                    }
                };
                let result = {
                    let mut guard = self.lock_hand();
                    guard.as_mut().map(|hand| {
                        hand.player_action(&player, action).map(|()| {
                            hand.broadcast(Signal::ActionAccepted {
                                player: player.name().to_string(),
                                action,
                            });
                        })
                    })
                };
                match result {
                    Some(Ok(())) => {
                        tracing::debug!(player = %player.name(), "made their bet");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(player = %player.name(), error = %e, "rejected action");
                    }
                    None => break,
                }
            }
        }

        let mut guard = self.lock_hand();
        if let Some(hand) = guard.as_mut() {
            hand.create_pots();
            if let Some(round) = hand.round.as_mut() {
                round.round_done = true;
            }
        }
        tracing::debug!("round of betting is done");
    }

    fn hand_done(&self) -> bool {
        self.lock_hand().as_ref().map_or(true, |hand| hand.is_done())
    }

    fn deal_street(&self) -> TableResult<()> {
        match self.lock_hand().as_mut() {
            Some(hand) => hand.deal(),
            None => Ok(()),
        }
    }

    fn finish_board_if_complete(&self) {
        if let Some(hand) = self.lock_hand().as_mut() {
            if hand.board.len() == BOARD_SIZE {
                hand.hand_done = true;
            }
        }
    }

    fn finish_current_hand(&self) -> TableResult<()> {
        match self.lock_hand().as_mut() {
            Some(hand) => hand.finish_hand(),
            None => Ok(()),
        }
    }
}
