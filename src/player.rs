//! A player's identity, chips, per-hand state, and the inboxes used to
//! interact with a running table.

use crate::constants::SIGNAL_CHANNEL_CAPACITY;
use crate::deck::{card_label, Card};
use crate::eval::HandRank;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::{broadcast, mpsc};

static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(0);

/// Stable player identity. Pot eligibility is keyed off this, never off a
/// seat number or iteration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlayerId(u64);

/// An action a player can take during their turn in a round. The value on
/// `Raise` and `AllIn` is the TOTAL amount committed to the current street
/// after the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "bet")]
pub enum Action {
    Call,
    Raise(i64),
    AllIn(i64),
    Fold,
}

/// Game events broadcast to each participant's signal inbox. Cards travel
/// as display labels, ready for a client to show.
#[derive(Debug, Clone, Serialize)]
pub enum Signal {
    HandStarted { dealer: String },
    StreetDealt { board: Vec<String> },
    TurnStarted { player: String, current_bet: i64 },
    ActionAccepted { player: String, action: Action },
    HandFinished,
}

#[derive(Debug, Default)]
pub(crate) struct PlayerState {
    pub funds: i64,
    pub bet_amount: i64,
    pub hole_cards: Vec<Card>,
    pub hand_rank: Option<HandRank>,
    pub playing: bool,
    pub all_in: bool,
    pub folded: bool,
    pub wants_to_stand_up: bool,
}

/// A player at (or between) tables. Shared between the table's play loop and
/// the client driving the player, so all mutable state lives behind locks.
pub struct Player {
    id: PlayerId,
    name: String,
    state: Mutex<PlayerState>,
    table: Mutex<Weak<Table>>,
    action_tx: mpsc::Sender<Action>,
    action_rx: tokio::sync::Mutex<mpsc::Receiver<Action>>,
    signal_tx: broadcast::Sender<Signal>,
}

impl Player {
    /// Create a new player with a starting stack.
    pub fn new(name: impl Into<String>, funds: i64) -> Arc<Self> {
        // Capacity 1: a client submitting an action waits until the play
        // loop has room for it, one action per turn.
        let (action_tx, action_rx) = mpsc::channel(1);
        let (signal_tx, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Arc::new(Self {
            id: PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            state: Mutex::new(PlayerState {
                funds,
                ..PlayerState::default()
            }),
            table: Mutex::new(Weak::new()),
            action_tx,
            action_rx: tokio::sync::Mutex::new(action_rx),
            signal_tx,
        })
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn funds(&self) -> i64 {
        self.state().funds
    }

    pub fn bet_amount(&self) -> i64 {
        self.state().bet_amount
    }

    pub fn is_playing(&self) -> bool {
        self.state().playing
    }

    pub fn is_all_in(&self) -> bool {
        self.state().all_in
    }

    pub fn hole_cards(&self) -> Vec<Card> {
        self.state().hole_cards.clone()
    }

    /// The strength of this player's last evaluated showdown hand.
    pub fn hand_rank(&self) -> Option<HandRank> {
        self.state().hand_rank
    }

    /// Deliver an action to this player's inbox. The play loop consumes one
    /// action per turn; waiting for inbox capacity is the back-pressure.
    pub async fn submit(&self, action: Action) {
        let _ = self.action_tx.send(action).await;
    }

    /// Subscribe to the game events this player is sent.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.signal_tx.subscribe()
    }

    /// Leave the table. While a hand is being played the request is
    /// deferred and applied between hands; otherwise the seat is freed
    /// immediately.
    pub fn stand_up(&self) {
        let playing = {
            let mut state = self.state();
            if state.playing {
                state.wants_to_stand_up = true;
            }
            state.playing
        };
        if playing {
            tracing::debug!(player = %self.name, "will stand up after current hand");
            return;
        }
        if let Some(table) = self.table_ref() {
            if let Err(e) = table.remove_player(self) {
                tracing::debug!(player = %self.name, error = %e, "stand up ignored");
            }
        }
    }

    /// The table this player is seated at, if any.
    pub fn table(&self) -> Option<Arc<Table>> {
        self.table_ref()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_table(&self, table: Weak<Table>) {
        *self.table.lock().unwrap_or_else(PoisonError::into_inner) = table;
    }

    fn table_ref(&self) -> Option<Arc<Table>> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .upgrade()
    }

    pub(crate) fn signal(&self, signal: Signal) {
        let _ = self.signal_tx.send(signal);
    }

    /// Wait for the next action in this player's inbox.
    pub(crate) async fn next_action(&self) -> Option<Action> {
        self.action_rx.lock().await.recv().await
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        write!(f, "{}, funds: {}", self.name, state.funds)?;
        if state.playing {
            write!(f, ", bet: {}", state.bet_amount)?;
            if !state.hole_cards.is_empty() {
                write!(f, ", cards:")?;
                for card in &state.hole_cards {
                    write!(f, " {}", card_label(card))?;
                }
            }
        } else {
            write!(f, ", not playing")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ids_are_unique() {
        let a = Player::new("Anna", 100);
        let b = Player::new("Anna", 100);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_display_reflects_playing_state() {
        let player = Player::new("Joe", 300);
        assert_eq!(player.to_string(), "Joe, funds: 300, not playing");

        {
            let mut state = player.state();
            state.playing = true;
            state.bet_amount = 100;
        }
        assert_eq!(player.to_string(), "Joe, funds: 300, bet: 100");
    }

    #[tokio::test]
    async fn test_submit_fills_inbox() {
        let player = Player::new("Joe", 300);
        player.submit(Action::Fold).await;
        assert_eq!(player.next_action().await, Some(Action::Fold));
    }
}
