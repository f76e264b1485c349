//! Integration tests for the engine actor, driven through `EngineHandle`.

use std::time::Duration;

use clash_protocol::{Choice, Outcome, PlayerId, ResultPayload, Role, ServerMessage, StartPayload};
use clash_round::{EngineHandle, EngineInfo, JoinOutcome, RoundConfig, RoundError, spawn_engine};
use clash_session::Participant;
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn engine() -> EngineHandle {
    spawn_engine(RoundConfig::default(), 64)
}

/// Drains everything queued for a participant so far.
fn drain(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

fn results(msgs: &[ServerMessage]) -> Vec<&ResultPayload> {
    msgs.iter()
        .filter_map(|msg| match msg {
            ServerMessage::Result(r) => Some(r),
            _ => None,
        })
        .collect()
}

/// Seats two fresh participants in a round and clears their queues.
async fn start_round(
    handle: &EngineHandle,
    first: u64,
    second: u64,
) -> (
    mpsc::UnboundedReceiver<ServerMessage>,
    mpsc::UnboundedReceiver<ServerMessage>,
) {
    let (p1, mut rx1) = Participant::channel(PlayerId(first));
    let (p2, mut rx2) = Participant::channel(PlayerId(second));
    assert_eq!(handle.join(p1).await.unwrap(), JoinOutcome::Waiting);
    assert!(matches!(handle.join(p2).await.unwrap(), JoinOutcome::Started(_)));
    drain(&mut rx1);
    drain(&mut rx2);
    (rx1, rx2)
}

// =========================================================================
// Matchmaking
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_two_joins_form_a_round_with_first_as_player1() {
    let handle = engine();
    let (p1, mut rx1) = Participant::channel(PlayerId(1));
    let (p2, mut rx2) = Participant::channel(PlayerId(2));

    assert_eq!(handle.join(p1).await.unwrap(), JoinOutcome::Waiting);
    assert_eq!(
        drain(&mut rx1),
        vec![ServerMessage::Status("Waiting for opponent...".into())]
    );

    assert!(matches!(handle.join(p2).await.unwrap(), JoinOutcome::Started(_)));
    assert_eq!(
        drain(&mut rx1),
        vec![ServerMessage::Start(StartPayload { player: Role::Player1, countdown: 10 })]
    );
    assert_eq!(
        drain(&mut rx2),
        vec![ServerMessage::Start(StartPayload { player: Role::Player2, countdown: 10 })]
    );
}

#[tokio::test(start_paused = true)]
async fn test_third_join_waits() {
    let handle = engine();
    let (_rx1, _rx2) = start_round(&handle, 1, 2).await;
    let (p3, mut rx3) = Participant::channel(PlayerId(3));

    assert_eq!(handle.join(p3).await.unwrap(), JoinOutcome::Waiting);
    assert!(matches!(drain(&mut rx3).as_slice(), [ServerMessage::Status(_)]));
    assert_eq!(
        handle.info().await.unwrap(),
        EngineInfo { waiting: Some(PlayerId(3)), active_rounds: 1 }
    );
}

#[tokio::test(start_paused = true)]
async fn test_repeated_join_while_waiting_is_ignored() {
    let handle = engine();
    let (p1, mut rx1) = Participant::channel(PlayerId(1));

    handle.join(p1.clone()).await.unwrap();
    assert_eq!(handle.join(p1).await.unwrap(), JoinOutcome::Ignored);
    assert_eq!(drain(&mut rx1).len(), 1, "status sent once");
}

// =========================================================================
// Resolution
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_rock_beats_scissors_end_to_end() {
    let handle = engine();
    let (mut rx1, mut rx2) = start_round(&handle, 1, 2).await;

    handle.submit_move(PlayerId(1), Choice::Rock).await.unwrap();
    handle.submit_move(PlayerId(2), Choice::Scissors).await.unwrap();
    handle.info().await.unwrap();

    let msgs1 = drain(&mut rx1);
    let msgs2 = drain(&mut rx2);
    assert_eq!(
        results(&msgs1),
        vec![&ResultPayload {
            your_move: Choice::Rock,
            opponent_move: Choice::Scissors,
            outcome: Outcome::Win,
        }]
    );
    assert_eq!(
        results(&msgs2),
        vec![&ResultPayload {
            your_move: Choice::Scissors,
            opponent_move: Choice::Rock,
            outcome: Outcome::Lose,
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_early_resolution_is_not_repeated_at_deadline() {
    let handle = engine();
    let (mut rx1, mut rx2) = start_round(&handle, 1, 2).await;

    handle.submit_move(PlayerId(1), Choice::Paper).await.unwrap();
    handle.submit_move(PlayerId(2), Choice::Paper).await.unwrap();
    handle.info().await.unwrap();
    assert_eq!(results(&drain(&mut rx1))[0].outcome, Outcome::Draw);
    assert_eq!(results(&drain(&mut rx2))[0].outcome, Outcome::Draw);

    tokio::time::sleep(Duration::from_secs(11)).await;
    handle.info().await.unwrap();

    assert!(drain(&mut rx1).is_empty());
    assert!(drain(&mut rx2).is_empty());
    assert_eq!(handle.info().await.unwrap().active_rounds, 0);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_synthesizes_missing_move() {
    let handle = engine();
    let (mut rx1, mut rx2) = start_round(&handle, 1, 2).await;

    handle.submit_move(PlayerId(2), Choice::Rock).await.unwrap();
    tokio::time::sleep(Duration::from_secs(9)).await;
    handle.info().await.unwrap();
    assert!(drain(&mut rx1).is_empty(), "no result before the deadline");

    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.info().await.unwrap();

    let msgs1 = drain(&mut rx1);
    let msgs2 = drain(&mut rx2);
    let r1 = results(&msgs1);
    let r2 = results(&msgs2);
    assert_eq!(r1.len(), 1);
    assert_eq!(r2.len(), 1);
    assert!(r1[0].your_move.is_standard());
    assert_eq!(r1[0].opponent_move, Choice::Rock);
    assert_eq!(r2[0].your_move, Choice::Rock);
    assert_eq!(r2[0].opponent_move, r1[0].your_move);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_move_keeps_first() {
    let handle = engine();
    let (mut rx1, _rx2) = start_round(&handle, 1, 2).await;

    handle.submit_move(PlayerId(1), Choice::Rock).await.unwrap();
    handle.submit_move(PlayerId(1), Choice::Paper).await.unwrap();
    handle.info().await.unwrap();
    assert!(drain(&mut rx1).is_empty(), "a repeated move must not resolve the round");

    handle.submit_move(PlayerId(2), Choice::Paper).await.unwrap();
    handle.info().await.unwrap();

    let msgs = drain(&mut rx1);
    let r1 = results(&msgs);
    assert_eq!(r1[0].your_move, Choice::Rock);
    assert_eq!(r1[0].outcome, Outcome::Lose);
}

#[tokio::test(start_paused = true)]
async fn test_move_outside_round_is_ignored() {
    let handle = engine();
    let (p1, mut rx1) = Participant::channel(PlayerId(1));
    handle.join(p1).await.unwrap();
    drain(&mut rx1);

    handle.submit_move(PlayerId(1), Choice::Rock).await.unwrap();
    handle.submit_move(PlayerId(42), Choice::Rock).await.unwrap();

    assert_eq!(
        handle.info().await.unwrap(),
        EngineInfo { waiting: Some(PlayerId(1)), active_rounds: 0 }
    );
    assert!(drain(&mut rx1).is_empty());
}

// =========================================================================
// Disconnects
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_waiting_disconnect_clears_slot() {
    let handle = engine();
    let (p1, _rx1) = Participant::channel(PlayerId(1));
    handle.join(p1).await.unwrap();

    handle.disconnect(PlayerId(1)).await.unwrap();
    assert_eq!(handle.info().await.unwrap().waiting, None);

    let (p2, _rx2) = Participant::channel(PlayerId(2));
    assert_eq!(handle.join(p2).await.unwrap(), JoinOutcome::Waiting);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_mid_round_still_resolves_at_deadline() {
    let handle = engine();
    let (rx1, mut rx2) = start_round(&handle, 1, 2).await;

    handle.submit_move(PlayerId(2), Choice::Scissors).await.unwrap();
    drop(rx1);
    handle.disconnect(PlayerId(1)).await.unwrap();
    assert_eq!(handle.info().await.unwrap().active_rounds, 1);

    tokio::time::sleep(Duration::from_secs(11)).await;
    let info = handle.info().await.unwrap();

    assert_eq!(info.active_rounds, 0);
    let msgs = drain(&mut rx2);
    let r2 = results(&msgs);
    assert_eq!(r2.len(), 1);
    assert_eq!(r2[0].your_move, Choice::Scissors);
}

// =========================================================================
// Handle
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_custom_deadline_is_announced_and_honoured() {
    let handle = spawn_engine(RoundConfig::with_deadline(Duration::from_secs(3)), 8);
    let (p1, mut rx1) = Participant::channel(PlayerId(1));
    let (p2, _rx2) = Participant::channel(PlayerId(2));
    handle.join(p1).await.unwrap();
    handle.join(p2).await.unwrap();

    let msgs = drain(&mut rx1);
    assert!(msgs.contains(&ServerMessage::Start(StartPayload {
        player: Role::Player1,
        countdown: 3,
    })));

    tokio::time::sleep(Duration::from_secs(4)).await;
    handle.info().await.unwrap();
    assert_eq!(results(&drain(&mut rx1)).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_deadline_keeps_engine_alive() {
    let handle = spawn_engine(RoundConfig::with_deadline(Duration::from_secs(u64::MAX)), 8);
    let (_rx1, _rx2) = start_round(&handle, 1, 2).await;

    let (p3, mut rx3) = Participant::channel(PlayerId(3));
    assert_eq!(handle.join(p3).await.unwrap(), JoinOutcome::Waiting);
    assert!(matches!(drain(&mut rx3).as_slice(), [ServerMessage::Status(_)]));
    assert_eq!(handle.info().await.unwrap().active_rounds, 1);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_deadline_is_announced_as_maximum() {
    let handle = spawn_engine(RoundConfig::with_deadline(Duration::MAX), 8);
    let (p1, mut rx1) = Participant::channel(PlayerId(1));
    let (p2, _rx2) = Participant::channel(PlayerId(2));
    handle.join(p1).await.unwrap();
    handle.join(p2).await.unwrap();

    let msgs = drain(&mut rx1);
    assert!(msgs.contains(&ServerMessage::Start(StartPayload {
        player: Role::Player1,
        countdown: RoundConfig::MAX_DEADLINE.as_secs(),
    })));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_makes_handle_unavailable() {
    let handle = engine();
    handle.shutdown().await.unwrap();
    tokio::task::yield_now().await;

    let (p1, _rx1) = Participant::channel(PlayerId(1));
    assert!(matches!(handle.join(p1).await, Err(RoundError::Unavailable)));
    assert!(matches!(handle.info().await, Err(RoundError::Unavailable)));
}
