//! Table limits and default configuration values.

use std::time::Duration;

/// Maximum number of seats at a table.
pub const MAX_SEATS: usize = 10;

/// Minimum participants required to start a hand.
pub const MIN_PLAYERS_TO_PLAY: usize = 2;

/// Default minimum bet. The big blind posts this, the small blind half of it.
pub const DEFAULT_MIN_BET: i64 = 200;

/// Default time a player gets to act before their turn folds.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between the end of one hand and the start of the next.
pub const DEFAULT_INTER_HAND_DELAY: Duration = Duration::from_secs(5);

/// Capacity of each player's signal broadcast channel.
pub const SIGNAL_CHANNEL_CAPACITY: usize = 100;

/// Hole cards dealt to each participant.
pub const HOLE_CARDS: usize = 2;

/// Community cards dealt on the flop.
pub const FLOP_CARDS: usize = 3;

/// Full board size after the river.
pub const BOARD_SIZE: usize = 5;
