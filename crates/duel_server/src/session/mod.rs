//! The authoritative session state machine.
//!
//! A [`Session`] owns both participants' boards and the match-level
//! verdict. Participants never mutate shared state directly: they submit
//! intents, the owning task applies them one at a time, and the updated
//! snapshot fans back out. That single total order per session is what
//! makes the first-win tie-break well-defined: two "simultaneous"
//! winning guesses are just two commands in the queue, and the first one
//! applied wins.

pub mod registry;

use crate::error::IntentError;
use crate::protocol::{
    EndReason, ParticipantId, ParticipantSnapshot, SessionId, SessionSnapshot,
};
use duel_core::{Board, BoardStatus, GuessOutcome, GuessRejection, Lexicon};

/// Seats per session. A duel has exactly two.
pub const MAX_PARTICIPANTS: usize = 2;

/// One seat in a session.
#[derive(Debug, Clone)]
pub struct Participant {
    id: ParticipantId,
    display_name: String,
    board: Board,
    /// Mirrors `board.status() == Won`, but the session (not the board
    /// owner) is authoritative for it in multiplayer.
    has_won: bool,
    /// Whether a live transport connection is currently bound. A
    /// disconnected participant keeps its seat and board for reconnect.
    connected: bool,
}

impl Participant {
    fn new(display_name: String, target: &str) -> Self {
        Self {
            id: ParticipantId::new(),
            display_name,
            board: Board::new(target),
            has_won: false,
            connected: true,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    pub participant_id: ParticipantId,
    /// True when an existing seat was reclaimed rather than a new one
    /// created.
    pub reconnected: bool,
}

/// Result of an accepted guess, including any match-level consequence.
#[derive(Debug, Clone)]
pub struct GuessApplied {
    pub outcome: GuessOutcome,
    /// Set when this guess ended the match.
    pub match_end: Option<(Option<String>, EndReason)>,
}

/// The server-owned pairing of (at most) two participants over one
/// shared target word.
///
/// All mutating methods assume they are called from a single task; the
/// registry guarantees that by giving each session its own command queue.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    /// The shared answer, drawn once at creation and installed into both
    /// boards.
    target: String,
    participants: Vec<Participant>,
    host_id: Option<ParticipantId>,
    started: bool,
    ended: bool,
    winner_name: Option<String>,
    end_reason: Option<EndReason>,
}

impl Session {
    /// Creates an empty session around a target word. The first joiner
    /// becomes host.
    pub fn new(id: SessionId, target: impl Into<String>) -> Self {
        Self {
            id,
            target: target.into().to_ascii_lowercase(),
            participants: Vec::new(),
            host_id: None,
            started: false,
            ended: false,
            winner_name: None,
            end_reason: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// The first-ever joiner. `None` only before anyone has joined.
    pub fn host_id(&self) -> Option<ParticipantId> {
        self.host_id
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner_name.as_deref()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Seats a new participant, or rebinds an existing one when
    /// `reconnect` names a known participant id.
    ///
    /// A reconnect never alters board state and is accepted even after
    /// the match ended, so a dropped client can still fetch the final
    /// snapshot. A fresh join is rejected once both seats are taken or
    /// the match is over.
    pub fn join(
        &mut self,
        display_name: &str,
        reconnect: Option<ParticipantId>,
    ) -> Result<JoinOutcome, IntentError> {
        if let Some(id) = reconnect {
            if let Some(participant) = self.participants.iter_mut().find(|p| p.id == id) {
                participant.connected = true;
                return Ok(JoinOutcome {
                    participant_id: id,
                    reconnected: true,
                });
            }
            // Unknown reconnect identity falls through to a fresh join
            // attempt; the seat may have been reclaimed.
        }

        if self.ended || self.participants.len() >= MAX_PARTICIPANTS {
            return Err(IntentError::SessionFull);
        }

        let participant = Participant::new(display_name.to_string(), &self.target);
        let id = participant.id;
        self.participants.push(participant);
        if self.host_id.is_none() {
            self.host_id = Some(id);
        }

        Ok(JoinOutcome {
            participant_id: id,
            reconnected: false,
        })
    }

    /// Latches the started flag. Only the host may start, only with both
    /// seats filled, and only once; anything else is a silent no-op and
    /// the return value says whether the latch flipped.
    pub fn start(&mut self, requester: ParticipantId) -> bool {
        let authorized = self.host_id == Some(requester)
            && self.participants.len() == MAX_PARTICIPANTS
            && !self.started
            && !self.ended;
        if authorized {
            self.started = true;
        }
        authorized
    }

    /// Applies a guess to the named participant's board and evaluates
    /// the match-end conditions.
    ///
    /// Returns `Ok(None)` for the silent no-op cases (match not started,
    /// match already over, board already finished), `Err` for rejections
    /// that are reported back to the guesser, and `Ok(Some(..))` when
    /// state changed and a snapshot must be broadcast.
    pub fn submit_guess(
        &mut self,
        participant_id: ParticipantId,
        guess: &str,
        lexicon: &Lexicon,
    ) -> Result<Option<GuessApplied>, IntentError> {
        if self.ended || !self.started {
            return Ok(None);
        }

        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id)
            .ok_or(IntentError::UnknownParticipant)?;

        let outcome = match participant.board.submit_guess(guess, lexicon) {
            Ok(outcome) => outcome,
            // An individually finished board just stops accepting
            // guesses; the match itself may still be live.
            Err(GuessRejection::Finished) => return Ok(None),
            Err(rejection) => return Err(rejection.into()),
        };

        let match_end = self.evaluate_match_end(participant_id, &outcome);

        Ok(Some(GuessApplied { outcome, match_end }))
    }

    /// Marks a participant's transport binding inactive. Board state is
    /// retained for reconnect. Returns true while at least one
    /// participant is still connected.
    pub fn disconnect(&mut self, participant_id: ParticipantId) -> bool {
        if let Some(participant) = self.participants.iter_mut().find(|p| p.id == participant_id) {
            participant.connected = false;
        }
        self.participants.iter().any(|p| p.connected)
    }

    /// Builds the read-only snapshot broadcast to all participants.
    /// `None` only for a session nobody has joined yet.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let host_id = self.host_id?;
        Some(SessionSnapshot {
            session_id: self.id.clone(),
            host_id,
            participants: self
                .participants
                .iter()
                .map(|p| ParticipantSnapshot {
                    id: p.id,
                    display_name: p.display_name.clone(),
                    board: p.board.clone(),
                    has_won: p.has_won,
                    connected: p.connected,
                })
                .collect(),
            started: self.started,
            ended: self.ended,
            winner_name: self.winner_name.clone(),
            end_reason: self.end_reason,
        })
    }

    /// Match-end rules, run after every accepted guess while the match
    /// is live. The guesser winning ends the match immediately; guesses
    /// are applied in arrival order, so the first win is authoritative.
    fn evaluate_match_end(
        &mut self,
        guesser: ParticipantId,
        outcome: &GuessOutcome,
    ) -> Option<(Option<String>, EndReason)> {
        if outcome.is_win() {
            let name = self
                .participants
                .iter_mut()
                .find(|p| p.id == guesser)
                .map(|p| {
                    p.has_won = true;
                    p.display_name.clone()
                });
            self.ended = true;
            self.winner_name = name.clone();
            self.end_reason = Some(EndReason::Solved);
            return Some((name, EndReason::Solved));
        }

        let all_finished = self
            .participants
            .iter()
            .all(|p| p.board.status() != BoardStatus::Playing);
        if all_finished {
            self.ended = true;
            self.end_reason = Some(EndReason::EveryoneLost);
            return Some((None, EndReason::EveryoneLost));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSES: [&str; 6] = ["about", "tiger", "spoon", "flame", "quilt", "vodka"];

    fn lexicon() -> &'static Lexicon {
        Lexicon::embedded()
    }

    /// Two-seat session, started, with participant ids returned in join
    /// order (host first).
    fn started_session() -> (Session, ParticipantId, ParticipantId) {
        let mut session = Session::new("s1".to_string(), "crane");
        let a = session.join("Ada", None).unwrap().participant_id;
        let b = session.join("Grace", None).unwrap().participant_id;
        assert!(session.start(a));
        (session, a, b)
    }

    #[test]
    fn first_joiner_is_host() {
        let mut session = Session::new("s1".to_string(), "crane");
        let a = session.join("Ada", None).unwrap();
        assert!(!a.reconnected);
        assert_eq!(session.host_id(), Some(a.participant_id));

        let b = session.join("Grace", None).unwrap();
        assert_eq!(session.host_id(), Some(a.participant_id));
        assert_ne!(a.participant_id, b.participant_id);
    }

    #[test]
    fn third_join_is_rejected() {
        let (mut session, _, _) = started_session();
        assert_eq!(
            session.join("Eve", None).unwrap_err(),
            IntentError::SessionFull
        );
        assert_eq!(session.participants().len(), 2);
    }

    #[test]
    fn reconnect_reclaims_seat_without_touching_board() {
        let (mut session, a, _) = started_session();
        session.submit_guess(a, "trace", lexicon()).unwrap();
        session.disconnect(a);

        let rejoin = session.join("Ada", Some(a)).unwrap();
        assert!(rejoin.reconnected);
        assert_eq!(rejoin.participant_id, a);
        let participant = session.participants().iter().find(|p| p.id() == a).unwrap();
        assert!(participant.is_connected());
        assert_eq!(participant.board().guesses(), ["trace"]);
        assert_eq!(session.participants().len(), 2);
    }

    #[test]
    fn reconnect_allowed_after_match_end() {
        let (mut session, a, b) = started_session();
        session.submit_guess(a, "crane", lexicon()).unwrap();
        assert!(session.ended());

        session.disconnect(b);
        assert!(session.join("Grace", Some(b)).unwrap().reconnected);
        // A fresh joiner is still turned away.
        assert!(session.join("Eve", None).is_err());
    }

    #[test]
    fn non_host_cannot_start() {
        let mut session = Session::new("s1".to_string(), "crane");
        let _a = session.join("Ada", None).unwrap().participant_id;
        let b = session.join("Grace", None).unwrap().participant_id;

        assert!(!session.start(b));
        assert!(!session.started());
    }

    #[test]
    fn start_requires_two_participants() {
        let mut session = Session::new("s1".to_string(), "crane");
        let a = session.join("Ada", None).unwrap().participant_id;
        assert!(!session.start(a));
        assert!(!session.started());
    }

    #[test]
    fn start_latches_once() {
        let (mut session, a, _) = started_session();
        assert!(session.started());
        // Second attempt is a no-op, not an un-latch.
        assert!(!session.start(a));
        assert!(session.started());
    }

    #[test]
    fn guess_before_start_is_silently_ignored() {
        let mut session = Session::new("s1".to_string(), "crane");
        let a = session.join("Ada", None).unwrap().participant_id;
        let applied = session.submit_guess(a, "trace", lexicon()).unwrap();
        assert!(applied.is_none());
        let participant = &session.participants()[0];
        assert!(participant.board().guesses().is_empty());
    }

    #[test]
    fn winning_guess_ends_match_with_solved() {
        let (mut session, a, b) = started_session();

        session.submit_guess(b, "trace", lexicon()).unwrap();
        let applied = session.submit_guess(a, "crane", lexicon()).unwrap().unwrap();
        assert_eq!(
            applied.match_end,
            Some((Some("Ada".to_string()), EndReason::Solved))
        );
        assert!(session.ended());
        assert_eq!(session.winner_name(), Some("Ada"));
        assert_eq!(session.end_reason(), Some(EndReason::Solved));

        // Opponent's board is untouched and still `playing`.
        let opponent = session.participants().iter().find(|p| p.id() == b).unwrap();
        assert_eq!(opponent.board().status(), BoardStatus::Playing);
        assert!(!opponent.has_won());
    }

    #[test]
    fn first_win_takes_the_match() {
        // Both guesses would win; arrival order decides, not timing.
        let (mut session, a, b) = started_session();

        let first = session.submit_guess(b, "crane", lexicon()).unwrap().unwrap();
        assert!(first.match_end.is_some());
        assert_eq!(session.winner_name(), Some("Grace"));

        // A's identical winning guess arrives second: silently ignored.
        let second = session.submit_guess(a, "crane", lexicon()).unwrap();
        assert!(second.is_none());
        assert_eq!(session.winner_name(), Some("Grace"));
        assert_eq!(session.end_reason(), Some(EndReason::Solved));
    }

    #[test]
    fn everyone_lost_when_both_exhaust_guesses() {
        let (mut session, a, b) = started_session();

        for word in MISSES {
            session.submit_guess(a, word, lexicon()).unwrap().unwrap();
        }
        assert!(!session.ended());

        for word in &MISSES[..5] {
            session.submit_guess(b, word, lexicon()).unwrap().unwrap();
        }
        let last = session.submit_guess(b, MISSES[5], lexicon()).unwrap().unwrap();
        assert_eq!(last.match_end, Some((None, EndReason::EveryoneLost)));
        assert!(session.ended());
        assert_eq!(session.winner_name(), None);
        assert_eq!(session.end_reason(), Some(EndReason::EveryoneLost));
    }

    #[test]
    fn lost_participant_stops_but_match_continues() {
        let (mut session, a, b) = started_session();

        for word in MISSES {
            session.submit_guess(a, word, lexicon()).unwrap().unwrap();
        }
        // A is out of guesses; further guesses from A are silent no-ops.
        assert!(session.submit_guess(a, "crane", lexicon()).unwrap().is_none());
        assert!(!session.ended());

        // B can still win.
        let applied = session.submit_guess(b, "crane", lexicon()).unwrap().unwrap();
        assert_eq!(
            applied.match_end,
            Some((Some("Grace".to_string()), EndReason::Solved))
        );
    }

    #[test]
    fn malformed_guess_is_rejected_without_mutation() {
        let (mut session, a, _) = started_session();

        for _ in 0..2 {
            // Identical malformed resubmission stays rejected and inert.
            let err = session.submit_guess(a, "zzzzz", lexicon()).unwrap_err();
            assert_eq!(err.code(), "invalid-guess");
        }
        assert!(session.participants()[0].board().guesses().is_empty());
        assert!(!session.ended());
    }

    #[test]
    fn unknown_participant_is_rejected() {
        let (mut session, _, _) = started_session();
        let stranger = ParticipantId::new();
        assert_eq!(
            session.submit_guess(stranger, "crane", lexicon()).unwrap_err(),
            IntentError::UnknownParticipant
        );
        assert!(!session.ended());
    }

    #[test]
    fn guess_after_end_is_silently_ignored() {
        let (mut session, a, b) = started_session();
        session.submit_guess(a, "crane", lexicon()).unwrap();
        assert!(session.ended());

        assert!(session.submit_guess(b, "trace", lexicon()).unwrap().is_none());
        let opponent = session.participants().iter().find(|p| p.id() == b).unwrap();
        assert!(opponent.board().guesses().is_empty());
    }

    #[test]
    fn disconnect_retains_seat_and_host() {
        let (mut session, a, b) = started_session();
        assert!(session.disconnect(a));
        assert_eq!(session.participants().len(), 2);
        // Host id survives the host disconnecting.
        assert_eq!(session.host_id(), Some(a));
        // Last one out reports nobody connected.
        assert!(!session.disconnect(b));
    }

    #[test]
    fn snapshot_reflects_authoritative_state() {
        let (mut session, a, _) = started_session();
        session.submit_guess(a, "trace", lexicon()).unwrap();

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.session_id, "s1");
        assert_eq!(snapshot.host_id, a);
        assert_eq!(snapshot.participants.len(), 2);
        assert!(snapshot.started);
        assert!(!snapshot.ended);
        let ada = snapshot.participants.iter().find(|p| p.id == a).unwrap();
        assert_eq!(ada.board.guesses(), ["trace"]);
        assert_eq!(ada.board.verdicts().len(), 1);
    }

    #[test]
    fn both_boards_share_one_target() {
        let (session, _, _) = started_session();
        let targets: Vec<&str> = session
            .participants()
            .iter()
            .map(|p| p.board().target())
            .collect();
        assert_eq!(targets, ["crane", "crane"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Join(u8),
            Start(u8),
            Guess(u8, String),
            Disconnect(u8),
        }

        fn op() -> impl Strategy<Value = Op> {
            let word = prop::sample::select(vec![
                "crane", "trace", "about", "tiger", "spoon", "flame", "quilt", "vodka",
            ]);
            prop_oneof![
                (0u8..4).prop_map(Op::Join),
                (0u8..4).prop_map(Op::Start),
                (0u8..4, word).prop_map(|(who, w)| Op::Guess(who, w.to_string())),
                (0u8..4).prop_map(Op::Disconnect),
            ]
        }

        proptest! {
            /// Under arbitrary intent sequences: the seat count never
            /// exceeds two, `started`/`ended` never un-latch, and the
            /// winner never changes once set.
            #[test]
            fn session_invariants_hold(ops in proptest::collection::vec(op(), 0..60)) {
                let mut session = Session::new("prop".to_string(), "crane");
                let mut ids: Vec<ParticipantId> = Vec::new();
                let mut was_started = false;
                let mut was_ended = false;
                let mut winner: Option<String> = None;

                for op in ops {
                    match op {
                        Op::Join(_) => {
                            if let Ok(outcome) = session.join("P", None) {
                                ids.push(outcome.participant_id);
                            }
                        }
                        Op::Start(who) => {
                            if let Some(&id) = ids.get(who as usize) {
                                session.start(id);
                            }
                        }
                        Op::Guess(who, word) => {
                            if let Some(&id) = ids.get(who as usize) {
                                let _ = session.submit_guess(id, &word, Lexicon::embedded());
                            }
                        }
                        Op::Disconnect(who) => {
                            if let Some(&id) = ids.get(who as usize) {
                                session.disconnect(id);
                            }
                        }
                    }

                    prop_assert!(session.participants().len() <= MAX_PARTICIPANTS);
                    if was_started {
                        prop_assert!(session.started());
                    }
                    if was_ended {
                        prop_assert!(session.ended());
                        prop_assert_eq!(
                            session.winner_name().map(str::to_string),
                            winner.clone()
                        );
                    }
                    was_started |= session.started();
                    if session.ended() && !was_ended {
                        was_ended = true;
                        winner = session.winner_name().map(str::to_string);
                    }
                }
            }
        }
    }
}
