use super::TableConfig;
use crate::constants::{HOLE_CARDS, MIN_PLAYERS_TO_PLAY};
use crate::deck::{Card, Deck};
use crate::error::{TableError, TableResult};
use crate::player::{Player, Signal};
use crate::pot::Pot;
use crate::ring::PlayerRing;
use std::sync::Arc;

/// One street of betting. There are up to four per hand: pre-flop, flop,
/// turn, river.
pub(crate) struct Round {
    /// Ring slot of the player who bets next.
    pub bet_turn: usize,
    /// The amount a player must have matched on this street to stay in.
    pub current_bet: i64,
    pub round_done: bool,
}

/// A single hand being played: the deck, the board, the ring of
/// participants headed by the dealer, and the pot structure.
pub struct Hand {
    pub(crate) config: TableConfig,
    pub(crate) deck: Deck,
    pub(crate) board: Vec<Card>,
    pub(crate) players: PlayerRing,
    pub(crate) pot: Pot,
    pub(crate) round: Option<Round>,
    /// Slot of the street's opener: the round closes when the action walk
    /// returns here. Re-anchored to the raiser on every raise.
    pub(crate) first_to_bet: Option<usize>,
    /// No more betting is possible, but dealing may continue.
    pub(crate) betting_done: bool,
    /// Showdown or last-player-standing reached.
    pub(crate) hand_done: bool,
}

impl Hand {
    pub(crate) fn new(config: TableConfig, players: PlayerRing, pot: Pot) -> Self {
        Self {
            config,
            deck: Deck::new(),
            board: Vec::new(),
            players,
            pot,
            round: None,
            first_to_bet: None,
            betting_done: false,
            hand_done: false,
        }
    }

    pub fn dealer(&self) -> &Arc<Player> {
        self.players.get(self.players.head())
    }

    pub fn small_blind(&self) -> &Arc<Player> {
        self.players.get(self.players.next(self.players.head()))
    }

    pub fn big_blind(&self) -> &Arc<Player> {
        let sb = self.players.next(self.players.head());
        self.players.get(self.players.next(sb))
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn pot(&self) -> &Pot {
        &self.pot
    }

    pub fn is_done(&self) -> bool {
        self.hand_done
    }

    pub(crate) fn round_done(&self) -> bool {
        self.round.as_ref().map_or(false, |r| r.round_done)
    }

    pub(crate) fn current_bet(&self) -> Option<i64> {
        self.round.as_ref().map(|r| r.current_bet)
    }

    /// The player to act, while the round is open.
    pub(crate) fn current_better(&self) -> Option<Arc<Player>> {
        let round = self.round.as_ref()?;
        if round.round_done {
            return None;
        }
        Some(self.players.get(round.bet_turn).clone())
    }

    /// Shuffle, mark everyone in, deal hole cards around from the dealer,
    /// and open the pre-flop betting.
    pub(crate) fn start_hand(&mut self) -> TableResult<()> {
        if self.players.len() < MIN_PLAYERS_TO_PLAY {
            return Err(TableError::InsufficientPlayers {
                participants: self.players.len(),
                required: MIN_PLAYERS_TO_PLAY,
            });
        }
        self.validate_blinds()?;
        self.hand_done = false;
        self.deck.shuffle();

        let order: Vec<usize> = self.players.iter().map(|(slot, _)| slot).collect();
        for slot in order {
            let hole = self.deck.draw(HOLE_CARDS);
            let player = self.players.get(slot);
            let mut state = player.state();
            state.playing = true;
            state.folded = false;
            state.all_in = false;
            state.hand_rank = None;
            state.hole_cards = hole;
        }

        let dealer = self.dealer().name().to_string();
        tracing::info!(%dealer, participants = self.players.len(), "hand started");
        self.broadcast(Signal::HandStarted { dealer });
        self.start_bets();
        Ok(())
    }

    fn validate_blinds(&self) -> TableResult<()> {
        let small_blind_funds = self.small_blind().funds();
        let big_blind_funds = self.big_blind().funds();
        if small_blind_funds < self.config.min_bet / 2 || big_blind_funds < self.config.min_bet {
            return Err(TableError::BlindValidationFailed {
                small_blind_funds,
                big_blind_funds,
                min_bet: self.config.min_bet,
            });
        }
        Ok(())
    }

    fn take_blinds(&mut self) {
        let head = self.players.head();
        let sb_slot = self.players.next(head);
        let bb_slot = self.players.next(sb_slot);
        post_blind(self.players.get(sb_slot), self.config.min_bet / 2);
        post_blind(self.players.get(bb_slot), self.config.min_bet);
        tracing::debug!(
            small_blind = %self.players.get(sb_slot).name(),
            big_blind = %self.players.get(bb_slot).name(),
            min_bet = self.config.min_bet,
            "blinds posted"
        );

        let blind_all_in =
            self.players.get(sb_slot).is_all_in() || self.players.get(bb_slot).is_all_in();
        if blind_all_in && self.players.len() == 2 {
            if let Some(round) = self.round.as_mut() {
                round.round_done = true;
            }
            self.betting_done = true;
            tracing::debug!("blind went all in heads-up, no betting this hand");
        }
    }

    /// Open a betting round for the current street. Pre-flop the blinds
    /// post and the action starts past the big blind; post-flop the action
    /// starts past the dealer.
    pub(crate) fn start_bets(&mut self) {
        self.first_to_bet = None;
        let head = self.players.head();
        if self.board.is_empty() {
            self.round = Some(Round {
                bet_turn: head,
                current_bet: self.config.min_bet,
                round_done: false,
            });
            self.take_blinds();
            let sb_slot = self.players.next(head);
            let bb_slot = self.players.next(sb_slot);
            if let Some(round) = self.round.as_mut() {
                round.bet_turn = bb_slot;
            }
        } else {
            self.round = Some(Round {
                bet_turn: head,
                current_bet: 0,
                round_done: false,
            });
        }
        self.advance_to_next_better();
        if let Some(round) = self.round.as_ref() {
            self.first_to_bet = Some(round.bet_turn);
        }
        if !self.betting_done {
            if let Some(round) = self.round.as_ref() {
                // A lone solvent player with nothing left to match cannot
                // be bet into; an unmatched blind still demands a response.
                let betters: Vec<_> = self
                    .players
                    .iter()
                    .filter(|(_, p)| !p.is_all_in())
                    .map(|(_, p)| p.clone())
                    .collect();
                if betters.len() <= 1
                    && betters.iter().all(|p| p.bet_amount() == round.current_bet)
                {
                    self.betting_done = true;
                }
            }
        }
    }

    /// Number of participants still able to bet.
    pub(crate) fn better_count(&self) -> usize {
        self.players.iter().filter(|(_, p)| !p.is_all_in()).count()
    }

    pub(crate) fn broadcast(&self, signal: Signal) {
        for (_, player) in self.players.iter() {
            player.signal(signal.clone());
        }
    }
}

fn post_blind(player: &Arc<Player>, amount: i64) {
    let mut state = player.state();
    state.funds -= amount;
    state.bet_amount = amount;
    if state.funds == 0 {
        state.all_in = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn test_start_hand_positions_and_blinds() {
        let table = Table::new();
        table.sit_down(&Player::new("Anna", 400), 0).unwrap();
        table.sit_down(&Player::new("Joe", 400), 2).unwrap();
        table.sit_down(&Player::new("Bob", 400), 4).unwrap();
        table.sit_down(&Player::new("Nora", 400), 5).unwrap();

        let mut hand = table.new_hand().unwrap();
        hand.start_hand().unwrap();

        assert_eq!(hand.small_blind().name(), "Joe");
        assert_eq!(hand.small_blind().bet_amount(), 200 / 2);
        assert_eq!(hand.big_blind().name(), "Bob");
        assert_eq!(hand.big_blind().bet_amount(), 200);

        // First to act pre-flop is the player past the big blind.
        let better = hand.current_better().unwrap();
        assert_eq!(better.name(), "Nora");
        let opener = hand.first_to_bet.unwrap();
        assert_eq!(hand.players.get(opener).name(), "Nora");

        for (_, player) in hand.players.iter() {
            assert!(player.is_playing());
            assert_eq!(player.hole_cards().len(), 2);
        }
    }

    #[test]
    fn test_heads_up_dealer_posts_big_blind() {
        let table = Table::new();
        table.sit_down(&Player::new("Leto", 400), 0).unwrap();
        table.sit_down(&Player::new("Paul", 400), 2).unwrap();

        let mut hand = table.new_hand().unwrap();
        hand.start_hand().unwrap();

        assert_eq!(hand.dealer().name(), "Leto");
        assert_eq!(hand.big_blind().name(), "Leto");
        assert_eq!(hand.small_blind().name(), "Paul");
        // The small blind acts first heads-up.
        assert_eq!(hand.current_better().unwrap().name(), "Paul");
    }

    #[test]
    fn test_short_stacked_small_blind_goes_all_in_at_the_blinds() {
        let table = Table::new();
        let anna = Player::new("Anna", 300);
        let joe = Player::new("Joe", 300);
        table.sit_down(&anna, 0).unwrap();
        table.sit_down(&joe, 2).unwrap();
        joe.state().funds = 100;

        let mut hand = table.new_hand().unwrap();
        hand.start_hand().unwrap();

        assert_eq!(joe.bet_amount(), 100);
        assert!(joe.is_all_in());
        assert_eq!(anna.bet_amount(), 200);
        assert!(hand.round_done());
        assert!(hand.betting_done);
        // No pre-flop action is accepted.
        assert_eq!(
            hand.player_action(&anna, crate::player::Action::Call),
            Err(TableError::NotYourTurn)
        );
    }

    #[test]
    fn test_start_hand_requires_two_participants() {
        let table = Table::new();
        table.sit_down(&Player::new("Anna", 400), 0).unwrap();

        let mut hand = table.new_hand().unwrap();
        assert_eq!(
            hand.start_hand(),
            Err(TableError::InsufficientPlayers {
                participants: 1,
                required: 2
            })
        );
    }

    #[test]
    fn test_start_hand_validates_blinds() {
        let table = Table::new();
        let anna = Player::new("Anna", 400);
        let joe = Player::new("Joe", 400);
        table.sit_down(&anna, 0).unwrap();
        table.sit_down(&joe, 2).unwrap();

        let mut hand = table.new_hand().unwrap();
        // The big blind (dealer, heads-up) lost their stack after admission.
        anna.state().funds = 150;
        assert_eq!(
            hand.start_hand(),
            Err(TableError::BlindValidationFailed {
                small_blind_funds: 400,
                big_blind_funds: 150,
                min_bet: 200
            })
        );
    }

    #[test]
    fn test_post_flop_action_starts_past_the_dealer() {
        let table = Table::new();
        table.sit_down(&Player::new("Anna", 800), 0).unwrap();
        table.sit_down(&Player::new("Joe", 800), 2).unwrap();
        table.sit_down(&Player::new("Bob", 800), 4).unwrap();

        let mut hand = table.new_hand().unwrap();
        hand.start_hand().unwrap();
        hand.board = ["2c", "9d", "Kh"]
            .iter()
            .filter_map(|tag| crate::deck::parse_card(tag))
            .collect();
        hand.start_bets();

        // Small blind is the first active player past the dealer.
        assert_eq!(hand.current_better().unwrap().name(), "Joe");
        assert_eq!(hand.current_bet(), Some(0));
    }
}
