//! End-to-end hands driven through the public API: a table's play loop in
//! one task, players submitting actions from the test.

use holdem_engine::{Action, Player, Signal, Table, TableConfig, TableResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

fn test_config() -> TableConfig {
    TableConfig {
        min_bet: 200,
        turn_timeout: Duration::from_secs(5),
        inter_hand_delay: Duration::from_millis(20),
    }
}

fn spawn_play(table: &Arc<Table>) -> tokio::task::JoinHandle<TableResult<()>> {
    let _ = tracing_subscriber::fmt::try_init();
    let table = table.clone();
    tokio::spawn(async move { table.play().await })
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

async fn finished(handle: tokio::task::JoinHandle<TableResult<()>>) -> TableResult<()> {
    timeout(Duration::from_secs(10), handle)
        .await
        .expect("table should stop playing")
        .expect("play task should not panic")
}

#[tokio::test]
async fn test_heads_up_blinds_only_fold() {
    let table = Table::with_config(test_config());
    let leto = Player::new("Leto", 400);
    let paul = Player::new("Paul", 400);
    table.sit_down(&leto, 0).unwrap();
    table.sit_down(&paul, 2).unwrap();
    let handle = spawn_play(&table);

    wait_until(|| leto.is_playing() && paul.is_playing()).await;
    leto.stand_up();
    paul.stand_up();
    // Paul, the small blind, surrenders his 100.
    paul.submit(Action::Fold).await;

    assert!(finished(handle).await.is_err());
    assert!(!table.is_playing());
    assert_eq!(leto.funds(), 500);
    assert_eq!(paul.funds(), 300);
}

#[tokio::test]
async fn test_heads_up_all_in_showdown() {
    let table = Table::with_config(test_config());
    let leto = Player::new("Leto", 500);
    let paul = Player::new("Paul", 400);
    table.sit_down(&leto, 0).unwrap();
    table.sit_down(&paul, 2).unwrap();
    let handle = spawn_play(&table);

    wait_until(|| leto.is_playing() && paul.is_playing()).await;
    leto.stand_up();
    paul.stand_up();
    paul.submit(Action::Raise(400)).await;
    leto.submit(Action::Call).await;

    assert!(finished(handle).await.is_err());
    let total = leto.funds() + paul.funds();
    assert_eq!(total, 900);
    // The 800 pot went somewhere whole; Leto keeps his unbet 100 either way.
    assert!((leto.funds() >= 450) ^ (paul.funds() >= 450));
    assert!(leto.funds() >= 100);
}

#[tokio::test]
async fn test_three_way_all_in_builds_a_side_pot() {
    let table = Table::with_config(test_config());
    let leto = Player::new("Leto", 400);
    let paul = Player::new("Paul", 400);
    let frank = Player::new("Frank", 400);
    table.sit_down(&leto, 0).unwrap();
    table.sit_down(&paul, 2).unwrap();
    table.sit_down(&frank, 3).unwrap();
    let handle = spawn_play(&table);

    wait_until(|| leto.is_playing() && frank.is_playing()).await;
    leto.stand_up();
    paul.stand_up();
    frank.stand_up();
    leto.submit(Action::AllIn(400)).await;
    paul.submit(Action::Call).await;
    frank.submit(Action::Fold).await;

    assert!(finished(handle).await.is_err());
    // Frank's big blind is lost to the pot; the rest settles by rank.
    assert_eq!(frank.funds(), 200);
    assert_eq!(leto.funds() + paul.funds(), 1000);
    assert_eq!(leto.funds() + paul.funds() + frank.funds(), 1200);
}

#[tokio::test]
async fn test_checked_down_hand_conserves_chips() {
    let table = Table::with_config(test_config());
    let leto = Player::new("Leto", 400);
    let paul = Player::new("Paul", 400);
    table.sit_down(&leto, 0).unwrap();
    table.sit_down(&paul, 2).unwrap();
    let handle = spawn_play(&table);

    wait_until(|| leto.is_playing() && paul.is_playing()).await;
    leto.stand_up();
    paul.stand_up();
    // Pre-flop, then three streets checked down to showdown.
    for _ in 0..4 {
        paul.submit(Action::Call).await;
        leto.submit(Action::Call).await;
    }

    assert!(finished(handle).await.is_err());
    assert_eq!(leto.funds() + paul.funds(), 800);
    assert!(!table.is_playing());
}

#[tokio::test]
async fn test_fold_then_rematch() {
    let table = Table::with_config(TableConfig {
        inter_hand_delay: Duration::from_millis(200),
        ..test_config()
    });
    let leto = Player::new("Leto", 400);
    let paul = Player::new("Paul", 400);
    table.sit_down(&leto, 0).unwrap();
    table.sit_down(&paul, 2).unwrap();
    let handle = spawn_play(&table);

    wait_until(|| leto.is_playing() && paul.is_playing()).await;
    paul.submit(Action::Fold).await;
    wait_until(|| !leto.is_playing() && leto.funds() == 500).await;

    // The button moves to Paul for the rematch, so Leto posts the small
    // blind and folds it right back.
    wait_until(|| leto.is_playing() && paul.is_playing()).await;
    leto.stand_up();
    paul.stand_up();
    leto.submit(Action::Fold).await;

    assert!(finished(handle).await.is_err());
    assert_eq!(leto.funds(), 400);
    assert_eq!(paul.funds(), 400);
}

#[tokio::test]
async fn test_empty_dealer_seat_moves_the_button() {
    let table = Table::with_config(test_config());
    let leto = Player::new("Leto", 400);
    let paul = Player::new("Paul", 400);
    table.sit_down(&leto, 1).unwrap();
    table.sit_down(&paul, 2).unwrap();
    let handle = spawn_play(&table);

    wait_until(|| leto.is_playing() && paul.is_playing()).await;
    assert_eq!(table.snapshot().dealer_index, 1);
    leto.stand_up();
    paul.stand_up();
    paul.submit(Action::Fold).await;

    assert!(finished(handle).await.is_err());
    assert_eq!(leto.funds(), 500);
    assert_eq!(paul.funds(), 300);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_a_fold() {
    let table = Table::with_config(TableConfig {
        min_bet: 200,
        turn_timeout: Duration::from_millis(2),
        inter_hand_delay: Duration::ZERO,
    });
    let leto = Player::new("Leto", 400);
    let paul = Player::new("Paul", 400);
    table.sit_down(&leto, 0).unwrap();
    table.sit_down(&paul, 2).unwrap();
    let handle = spawn_play(&table);

    // Let the loop deal the hand without letting the clock move.
    for _ in 0..10_000 {
        if leto.is_playing() && paul.is_playing() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(leto.is_playing() && paul.is_playing());
    leto.stand_up();
    paul.stand_up();

    // Nobody acts: the small blind times out and Leto wins by fold.
    assert!(finished(handle).await.is_err());
    assert_eq!(leto.funds(), 500);
    assert_eq!(paul.funds(), 300);
    let snapshot = table.snapshot();
    assert!(snapshot.seats.iter().all(|seat| seat.is_none()));
    assert!(!snapshot.playing);
}

#[tokio::test]
async fn test_table_cannot_play_twice() {
    let table = Table::with_config(test_config());
    let leto = Player::new("Leto", 400);
    let paul = Player::new("Paul", 400);
    table.sit_down(&leto, 0).unwrap();
    table.sit_down(&paul, 2).unwrap();
    let handle = spawn_play(&table);

    wait_until(|| table.is_playing()).await;
    assert!(matches!(
        table.play().await,
        Err(holdem_engine::TableError::TableAlreadyPlaying)
    ));

    wait_until(|| leto.is_playing() && paul.is_playing()).await;
    leto.stand_up();
    paul.stand_up();
    paul.submit(Action::Fold).await;
    assert!(finished(handle).await.is_err());
}

#[tokio::test]
async fn test_participants_hear_the_hand_signals() {
    let table = Table::with_config(test_config());
    let leto = Player::new("Leto", 400);
    let paul = Player::new("Paul", 400);
    let mut signals = leto.subscribe();
    table.sit_down(&leto, 0).unwrap();
    table.sit_down(&paul, 2).unwrap();
    let handle = spawn_play(&table);

    wait_until(|| leto.is_playing() && paul.is_playing()).await;
    leto.stand_up();
    paul.stand_up();
    paul.submit(Action::Fold).await;
    assert!(finished(handle).await.is_err());

    let mut saw_started = false;
    let mut saw_turn = false;
    let mut saw_fold = false;
    let mut saw_finished = false;
    while let Ok(signal) = signals.try_recv() {
        match signal {
            Signal::HandStarted { dealer } => {
                assert_eq!(dealer, "Leto");
                saw_started = true;
            }
            Signal::TurnStarted { player, .. } => {
                assert_eq!(player, "Paul");
                saw_turn = true;
            }
            Signal::ActionAccepted { player, action } => {
                assert_eq!(player, "Paul");
                assert_eq!(action, Action::Fold);
                saw_fold = true;
            }
            Signal::HandFinished => saw_finished = true,
            Signal::StreetDealt { .. } => {}
        }
    }
    assert!(saw_started && saw_turn && saw_fold && saw_finished);
}
