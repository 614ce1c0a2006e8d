//! Engine error types.

use std::fmt;

/// Errors surfaced by seating, hand lifecycle, betting, and dealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    // Seating
    InsufficientFunds { required: i64, available: i64 },
    SeatOutOfRange { seat: usize, max_seats: usize },
    SeatOccupied { seat: usize },
    NotSeated,

    // Hand lifecycle
    InsufficientPlayers { participants: usize, required: usize },
    BlindValidationFailed {
        small_blind_funds: i64,
        big_blind_funds: i64,
        min_bet: i64,
    },
    NoDealerAvailable,
    TableAlreadyPlaying,

    // Actions
    NoRound,
    NotYourTurn,
    InsufficientBet { bet: i64, current_bet: i64 },
    RaiseTooSmall { min_raise: i64, attempted: i64 },
    NotAllIn { funds: i64, bet: i64 },

    // Dealing
    CurrentlyBetting,
    DealingDone,

    // Finish
    TableCurrentlyBetting,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "insufficient funds: required {}, available {}",
                    required, available
                )
            }
            TableError::SeatOutOfRange { seat, max_seats } => {
                write!(f, "seat {} is out of range (max {})", seat, max_seats)
            }
            TableError::SeatOccupied { seat } => write!(f, "seat {} is occupied", seat),
            TableError::NotSeated => write!(f, "player is not seated at this table"),
            TableError::InsufficientPlayers {
                participants,
                required,
            } => {
                write!(
                    f,
                    "insufficient players to start hand: {} of {} required",
                    participants, required
                )
            }
            TableError::BlindValidationFailed {
                small_blind_funds,
                big_blind_funds,
                min_bet,
            } => {
                write!(
                    f,
                    "failed to validate blinds: sb funds {}, bb funds {}, min bet {}",
                    small_blind_funds, big_blind_funds, min_bet
                )
            }
            TableError::NoDealerAvailable => write!(f, "could not find a next dealer"),
            TableError::TableAlreadyPlaying => write!(f, "table is already playing"),
            TableError::NoRound => write!(f, "no betting round is open"),
            TableError::NotYourTurn => write!(f, "it's not your turn to bet"),
            TableError::InsufficientBet { bet, current_bet } => {
                write!(f, "bet {} is below the current bet {}", bet, current_bet)
            }
            TableError::RaiseTooSmall {
                min_raise,
                attempted,
            } => {
                write!(
                    f,
                    "cannot raise less than the big blind: raised {}, minimum {}",
                    attempted, min_raise
                )
            }
            TableError::NotAllIn { funds, bet } => {
                write!(f, "this is not an all in: funds {}, bet {}", funds, bet)
            }
            TableError::CurrentlyBetting => write!(f, "currently betting"),
            TableError::DealingDone => write!(f, "dealing is done"),
            TableError::TableCurrentlyBetting => {
                write!(f, "table is currently betting")
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;
