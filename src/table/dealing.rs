use super::hand::{Hand, Round};
use crate::constants::{BOARD_SIZE, FLOP_CARDS};
use crate::deck::card_label;
use crate::error::{TableError, TableResult};
use crate::player::Signal;

impl Hand {
    /// Add shared cards to the board: three on the flop, one on the turn
    /// and river. Opens the next betting round unless no-one is left to
    /// act, in which case the board just runs out.
    pub(crate) fn deal(&mut self) -> TableResult<()> {
        if !self.round_done() {
            return Err(TableError::CurrentlyBetting);
        }
        if self.board.len() >= BOARD_SIZE {
            return Err(TableError::DealingDone);
        }

        let cards_to_draw = if self.board.is_empty() { FLOP_CARDS } else { 1 };
        let mut drawn = self.deck.draw(cards_to_draw);
        self.board.append(&mut drawn);
        let labels: Vec<String> = self.board.iter().map(card_label).collect();
        tracing::info!(board = %labels.join(" "), "dealt street");
        self.broadcast(Signal::StreetDealt { board: labels });

        if self.betting_done {
            // Nothing left to bet: the street opens already closed.
            self.round = Some(Round {
                bet_turn: self.players.head(),
                current_bet: 0,
                round_done: true,
            });
            if self.board.len() == BOARD_SIZE {
                self.hand_done = true;
            }
        } else {
            self.start_bets();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Action, Player};
    use crate::table::Table;

    fn heads_up_hand() -> (Hand, std::sync::Arc<Player>, std::sync::Arc<Player>) {
        let table = Table::new();
        let leto = Player::new("Leto", 400);
        let paul = Player::new("Paul", 400);
        table.sit_down(&leto, 0).unwrap();
        table.sit_down(&paul, 2).unwrap();
        let mut hand = table.new_hand().unwrap();
        hand.start_hand().unwrap();
        (hand, leto, paul)
    }

    #[test]
    fn test_deal_requires_a_closed_round() {
        let (mut hand, _leto, _paul) = heads_up_hand();
        assert_eq!(hand.deal(), Err(TableError::CurrentlyBetting));
    }

    #[test]
    fn test_streets_deal_three_then_one() {
        let (mut hand, leto, paul) = heads_up_hand();
        hand.player_action(&paul, Action::Call).unwrap();
        hand.player_action(&leto, Action::Call).unwrap();
        assert!(hand.round_done());
        hand.create_pots();

        hand.deal().unwrap();
        assert_eq!(hand.board().len(), 3);

        // Check the flop down.
        hand.player_action(&paul, Action::Call).unwrap();
        hand.player_action(&leto, Action::Call).unwrap();
        hand.deal().unwrap();
        assert_eq!(hand.board().len(), 4);

        hand.player_action(&paul, Action::Call).unwrap();
        hand.player_action(&leto, Action::Call).unwrap();
        hand.deal().unwrap();
        assert_eq!(hand.board().len(), 5);

        hand.player_action(&paul, Action::Call).unwrap();
        hand.player_action(&leto, Action::Call).unwrap();
        assert_eq!(hand.deal(), Err(TableError::DealingDone));
    }

    #[test]
    fn test_all_in_hand_runs_out_the_board() {
        let (mut hand, leto, paul) = heads_up_hand();
        hand.player_action(&paul, Action::AllIn(400)).unwrap();
        hand.player_action(&leto, Action::AllIn(400)).unwrap();
        assert!(hand.betting_done);
        assert!(hand.round_done());
        hand.create_pots();

        hand.deal().unwrap();
        assert!(hand.round_done());
        hand.deal().unwrap();
        hand.deal().unwrap();
        assert_eq!(hand.board().len(), 5);
        assert!(hand.is_done());
    }
}
