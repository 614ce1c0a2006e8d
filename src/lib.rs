//! Server-side No-Limit Texas Hold'em table engine.
//!
//! A [`Table`] seats up to ten [`Player`]s and drives hand after hand from
//! blind collection through street-by-street betting, side-pot
//! construction, and showdown. The play loop is a single async task per
//! table: clients deliver actions through each player's inbox with
//! [`Player::submit`], and a turn that outlives the configured timeout is
//! folded.
//!
//! ```no_run
//! use holdem_engine::{Action, Player, Table};
//!
//! # async fn run() {
//! let table = Table::new();
//! let leto = Player::new("Leto", 400);
//! let paul = Player::new("Paul", 400);
//! table.sit_down(&leto, 0).unwrap();
//! table.sit_down(&paul, 2).unwrap();
//!
//! let loop_table = table.clone();
//! tokio::spawn(async move { loop_table.play().await });
//!
//! paul.submit(Action::Raise(400)).await;
//! leto.submit(Action::Call).await;
//! # }
//! ```

pub mod constants;
pub mod deck;
pub mod error;
pub mod eval;
pub mod player;
pub mod pot;
mod ring;
pub mod table;

pub use deck::{card_label, parse_card, Card, Deck};
pub use error::{TableError, TableResult};
pub use eval::{evaluate_hand, HandCategory, HandRank};
pub use player::{Action, Player, PlayerId, Signal};
pub use pot::{Pot, SubPot};
pub use table::{Hand, HandSnapshot, PotSnapshot, SeatSnapshot, Table, TableConfig, TableSnapshot};
