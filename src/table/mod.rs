//! The table: seats, dealer button, configuration, and the play loop that
//! drives hand after hand.

mod actions;
mod dealing;
mod hand;
mod play;
mod showdown;
mod state;

pub use hand::Hand;
pub use state::{HandSnapshot, PotSnapshot, SeatSnapshot, TableSnapshot};

use crate::constants::{DEFAULT_INTER_HAND_DELAY, DEFAULT_MIN_BET, DEFAULT_TURN_TIMEOUT, MAX_SEATS};
use crate::error::{TableError, TableResult};
use crate::player::Player;
use crate::pot::Pot;
use crate::ring::PlayerRing;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;

/// Nuances of the game played at a table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The big blind. The small blind posts half of it, and it is the
    /// minimum raise increment.
    pub min_bet: i64,
    /// How long a player gets to act before their turn is folded.
    pub turn_timeout: Duration,
    /// Pause between the end of one hand and the start of the next.
    pub inter_hand_delay: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_bet: DEFAULT_MIN_BET,
            turn_timeout: DEFAULT_TURN_TIMEOUT,
            inter_hand_delay: DEFAULT_INTER_HAND_DELAY,
        }
    }
}

pub(crate) struct SeatMap {
    pub seats: [Option<Arc<Player>>; MAX_SEATS],
    pub dealer_index: usize,
}

impl SeatMap {
    /// Next occupied seat strictly after `from`, scanning forward.
    fn next_occupied(&self, from: usize) -> Option<usize> {
        (1..MAX_SEATS)
            .map(|i| (from + i) % MAX_SEATS)
            .find(|&index| self.seats[index].is_some())
    }
}

/// A poker table: the group of players playing hands at it.
pub struct Table {
    config: TableConfig,
    seats: RwLock<SeatMap>,
    hand: Mutex<Option<Hand>>,
    playing: AtomicBool,
    self_ref: Weak<Table>,
}

impl Table {
    /// Create a table with the default configuration.
    pub fn new() -> Arc<Self> {
        Self::with_config(TableConfig::default())
    }

    /// Create a table with a custom configuration.
    pub fn with_config(config: TableConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            config,
            seats: RwLock::new(SeatMap {
                seats: std::array::from_fn(|_| None),
                dealer_index: 0,
            }),
            hand: Mutex::new(None),
            playing: AtomicBool::new(false),
            self_ref: weak.clone(),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Whether the play loop is currently running.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Seat a player. The player must be able to cover the big blind.
    pub fn sit_down(&self, player: &Arc<Player>, seat: usize) -> TableResult<()> {
        let mut seats = self.write_seats();
        let funds = player.funds();
        if funds < self.config.min_bet {
            return Err(TableError::InsufficientFunds {
                required: self.config.min_bet,
                available: funds,
            });
        }
        if seat >= MAX_SEATS {
            return Err(TableError::SeatOutOfRange {
                seat,
                max_seats: MAX_SEATS,
            });
        }
        if seats.seats[seat].is_some() {
            return Err(TableError::SeatOccupied { seat });
        }
        player.set_table(self.self_ref.clone());
        seats.seats[seat] = Some(player.clone());
        tracing::debug!(player = %player.name(), seat, "player sat down");
        Ok(())
    }

    /// Free a player's seat immediately.
    pub(crate) fn remove_player(&self, player: &Player) -> TableResult<()> {
        let mut seats = self.write_seats();
        for slot in seats.seats.iter_mut() {
            let occupied = slot.as_ref().map_or(false, |p| p.id() == player.id());
            if occupied {
                {
                    let mut state = player.state();
                    state.playing = false;
                    state.wants_to_stand_up = false;
                }
                *slot = None;
                tracing::debug!(player = %player.name(), "player stood up");
                return Ok(());
            }
        }
        Err(TableError::NotSeated)
    }

    /// Move the dealer button to the next occupied seat.
    pub(crate) fn increment_dealer_index(&self) -> TableResult<()> {
        let mut seats = self.write_seats();
        match seats.next_occupied(seats.dealer_index) {
            Some(index) => {
                tracing::debug!(dealer_index = index, "advanced dealer button");
                seats.dealer_index = index;
                Ok(())
            }
            None => Err(TableError::NoDealerAvailable),
        }
    }

    /// Build the next hand: pick participants, seed the main pot.
    pub(crate) fn new_hand(&self) -> TableResult<Hand> {
        let mut seats = self.write_seats();
        if seats.seats[seats.dealer_index].is_none() {
            seats.dealer_index = seats
                .next_occupied(seats.dealer_index)
                .ok_or(TableError::NoDealerAvailable)?;
        }
        let (players, pot) = Self::players_for_hand(&mut seats, &self.config);
        let head = players.len().saturating_sub(1);
        Ok(Hand::new(
            self.config.clone(),
            PlayerRing::new(players, head),
            pot,
        ))
    }

    /// Walk the seats once, starting left of the dealer, admitting every
    /// player who can cover the forced bet their position demands. Players
    /// who cannot are unseated. The admitted sequence runs small blind
    /// first and dealer last, so the dealer heads the resulting ring.
    fn players_for_hand(
        seats: &mut SeatMap,
        config: &TableConfig,
    ) -> (Vec<Arc<Player>>, Pot) {
        let mut admitted: Vec<Arc<Player>> = Vec::new();
        let mut eligible = HashSet::new();
        let start = (seats.dealer_index + 1) % MAX_SEATS;
        for i in 0..MAX_SEATS {
            let index = (start + i) % MAX_SEATS;
            let player = match seats.seats[index].clone() {
                Some(player) => player,
                None => continue,
            };
            let funds = player.funds();
            if funds <= 0
                || (admitted.is_empty() && funds < config.min_bet / 2)
                || (admitted.len() == 1 && funds < config.min_bet)
            {
                tracing::info!(
                    player = %player.name(),
                    funds,
                    "unseating player who cannot cover a forced bet"
                );
                seats.seats[index] = None;
                continue;
            }
            eligible.insert(player.id());
            admitted.push(player);
        }
        (admitted, Pot::new(eligible))
    }

    /// Between hands: free the seat of anyone who is broke or asked to
    /// stand up while a hand was running.
    pub(crate) fn stand_up_finished_players(&self) {
        let mut seats = self.write_seats();
        for slot in seats.seats.iter_mut() {
            let stand = slot.as_ref().map_or(false, |p| {
                let state = p.state();
                state.funds == 0 || state.wants_to_stand_up
            });
            if stand {
                if let Some(player) = slot.take() {
                    let mut state = player.state();
                    state.playing = false;
                    state.wants_to_stand_up = false;
                    tracing::info!(player = %player.name(), funds = state.funds, "player stood up");
                }
            }
        }
    }

    pub(crate) fn read_seats(&self) -> RwLockReadGuard<'_, SeatMap> {
        self.seats.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_seats(&self) -> RwLockWriteGuard<'_, SeatMap> {
        self.seats.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock_hand(&self) -> MutexGuard<'_, Option<Hand>> {
        self.hand.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::SeqCst);
    }

    pub(crate) fn swap_playing(&self, playing: bool) -> bool {
        self.playing.swap(playing, Ordering::SeqCst)
    }
}
