//! End-to-end coordinator scenarios, driven through the session
//! registry the same way the WebSocket handlers drive it.

use duel_core::Lexicon;
use duel_server::protocol::{EndReason, Frame, ParticipantId};
use duel_server::session::registry::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::timeout;

/// Words guaranteed to contain at least six non-winning guesses for any
/// target drawn from the lexicon.
const GUESS_POOL: [&str; 7] = ["about", "tiger", "spoon", "flame", "quilt", "vodka", "zebra"];

fn registry() -> Arc<SessionRegistry> {
    Arc::new(SessionRegistry::new(
        Arc::new(Lexicon::embedded().clone()),
        Duration::from_secs(60),
    ))
}

async fn next_frame(rx: &mut UnboundedReceiver<Frame>) -> Frame {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for frame")
        .expect("frame channel closed")
}

/// Awaits frames until one matches the predicate.
async fn frame_matching<F>(rx: &mut UnboundedReceiver<Frame>, mut pred: F) -> Frame
where
    F: FnMut(&Frame) -> bool,
{
    loop {
        let frame = next_frame(rx).await;
        if pred(&frame) {
            return frame;
        }
    }
}

struct Seat {
    id: ParticipantId,
    rx: UnboundedReceiver<Frame>,
}

/// Joins both seats and starts the match, returning the seats and the
/// shared target word.
async fn started_duel(registry: &SessionRegistry, session_id: &str) -> (Seat, Seat, String) {
    let sid = session_id.to_string();
    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();

    let a = registry
        .join(&sid, "Ada".to_string(), None, tx_a)
        .await
        .unwrap()
        .participant_id;
    let b = registry
        .join(&sid, "Grace".to_string(), None, tx_b)
        .await
        .unwrap()
        .participant_id;

    registry.start(&sid, a).unwrap();
    frame_matching(&mut rx_a, |f| matches!(f, Frame::GameStarted {})).await;
    frame_matching(&mut rx_b, |f| matches!(f, Frame::GameStarted {})).await;

    let update = frame_matching(&mut rx_a, |f| {
        matches!(f, Frame::SessionUpdate(s) if s.started)
    })
    .await;
    let target = match update {
        Frame::SessionUpdate(snapshot) => snapshot.participants[0].board.target().to_string(),
        _ => unreachable!(),
    };

    (
        Seat { id: a, rx: rx_a },
        Seat { id: b, rx: rx_b },
        target,
    )
}

/// Six legal guesses that are all wrong for this target.
fn six_misses(target: &str) -> Vec<&'static str> {
    GUESS_POOL
        .iter()
        .copied()
        .filter(|w| *w != target)
        .take(6)
        .collect()
}

#[tokio::test]
async fn winner_is_announced_to_both_participants() {
    let registry = registry();
    let (mut a, mut b, target) = started_duel(&registry, "announce").await;

    registry.guess(&"announce".to_string(), a.id, target).unwrap();

    for seat in [&mut a, &mut b] {
        let ended = frame_matching(&mut seat.rx, |f| matches!(f, Frame::GameEnded { .. })).await;
        match ended {
            Frame::GameEnded { winner, reason } => {
                assert_eq!(winner.as_deref(), Some("Ada"));
                assert_eq!(reason, EndReason::Solved);
            }
            _ => unreachable!(),
        }
    }
}

#[tokio::test]
async fn first_winning_guess_takes_the_match() {
    let registry = registry();
    let (mut a, b, target) = started_duel(&registry, "tiebreak").await;
    let sid = "tiebreak".to_string();

    // Both would win; B's intent is queued first, so B wins regardless
    // of how close together the submissions were.
    registry.guess(&sid, b.id, target.clone()).unwrap();
    registry.guess(&sid, a.id, target).unwrap();

    let ended = frame_matching(&mut a.rx, |f| matches!(f, Frame::GameEnded { .. })).await;
    match ended {
        Frame::GameEnded { winner, reason } => {
            assert_eq!(winner.as_deref(), Some("Grace"));
            assert_eq!(reason, EndReason::Solved);
        }
        _ => unreachable!(),
    }

    // No second ended frame follows for A's late win.
    while let Ok(Some(frame)) = timeout(Duration::from_millis(50), a.rx.recv()).await {
        assert!(!matches!(frame, Frame::GameEnded { .. }));
    }
}

#[tokio::test]
async fn exhausting_both_boards_ends_with_everyone_lost() {
    let registry = registry();
    let (mut a, mut b, target) = started_duel(&registry, "drain").await;
    let sid = "drain".to_string();

    for word in six_misses(&target) {
        registry.guess(&sid, a.id, word.to_string()).unwrap();
        registry.guess(&sid, b.id, word.to_string()).unwrap();
    }

    for seat in [&mut a, &mut b] {
        let ended = frame_matching(&mut seat.rx, |f| matches!(f, Frame::GameEnded { .. })).await;
        match ended {
            Frame::GameEnded { winner, reason } => {
                assert_eq!(winner, None);
                assert_eq!(reason, EndReason::EveryoneLost);
            }
            _ => unreachable!(),
        }
    }
}

#[tokio::test]
async fn snapshots_arrive_in_apply_order() {
    let registry = registry();
    let (a, mut b, target) = started_duel(&registry, "ordering").await;
    let sid = "ordering".to_string();

    let misses = six_misses(&target);
    for word in &misses[..3] {
        registry.guess(&sid, a.id, word.to_string()).unwrap();
    }

    // B must observe A's guess count growing monotonically.
    let mut last_seen = 0;
    while last_seen < 3 {
        if let Frame::SessionUpdate(snapshot) = next_frame(&mut b.rx).await {
            let count = snapshot
                .participants
                .iter()
                .find(|p| p.id == a.id)
                .unwrap()
                .board
                .guesses()
                .len();
            assert!(count >= last_seen, "snapshot arrived out of order");
            last_seen = count;
        }
    }
}

#[tokio::test]
async fn sessions_are_fully_independent() {
    let registry = registry();
    let (a1, _b1, target1) = started_duel(&registry, "left").await;
    let (_a2, mut b2, _target2) = started_duel(&registry, "right").await;
    assert_eq!(registry.session_count(), 2);

    // Ending the left session must not produce frames in the right one.
    registry.guess(&"left".to_string(), a1.id, target1).unwrap();
    tokio::task::yield_now().await;

    while let Ok(Some(frame)) = timeout(Duration::from_millis(50), b2.rx.recv()).await {
        assert!(
            !matches!(frame, Frame::GameEnded { .. }),
            "frame from another session leaked"
        );
    }
    assert_eq!(registry.session_count(), 2);
}

#[tokio::test]
async fn stale_session_ids_report_not_found() {
    let registry = registry();
    let sid = "ghost".to_string();
    assert!(registry.start(&sid, ParticipantId::new()).is_err());
    assert!(registry
        .guess(&sid, ParticipantId::new(), "crane".to_string())
        .is_err());
}
