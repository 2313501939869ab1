//! Single-player rounds.
//!
//! A [`SoloRound`] bundles a [`Board`] with its keyboard-hint aggregate
//! and applies the same evaluation the multiplayer coordinator uses, so a
//! client can run solo play entirely locally.

use crate::board::{Board, BoardStatus, GuessOutcome, GuessRejection};
use crate::hints::KeyboardHints;
use crate::lexicon::Lexicon;

/// One local round against a single target word.
#[derive(Debug, Clone)]
pub struct SoloRound {
    board: Board,
    hints: KeyboardHints,
}

impl SoloRound {
    /// Starts a round against a random target from the lexicon.
    pub fn new(lexicon: &Lexicon) -> Self {
        Self::with_target(lexicon.pick_target())
    }

    /// Starts a round against a known target. Used for tests and for
    /// restoring a round from a saved board.
    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            board: Board::new(target),
            hints: KeyboardHints::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hints(&self) -> &KeyboardHints {
        &self.hints
    }

    pub fn status(&self) -> BoardStatus {
        self.board.status()
    }

    /// Forwards a typed letter to the board.
    pub fn append_letter(&mut self, letter: char) {
        self.board.append_letter(letter);
    }

    /// Forwards a backspace to the board.
    pub fn delete_letter(&mut self) {
        self.board.delete_letter();
    }

    /// Submits the pending guess and folds the verdicts into the
    /// keyboard hints on acceptance.
    pub fn submit(&mut self, lexicon: &Lexicon) -> Result<GuessOutcome, GuessRejection> {
        let guess = self.board.pending().to_string();
        let outcome = self.board.submit_pending(lexicon)?;
        self.hints.record(&guess, &outcome.verdicts);
        Ok(outcome)
    }
}
