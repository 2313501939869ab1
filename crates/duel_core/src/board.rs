//! One participant's puzzle progress.
//!
//! A [`Board`] is the state machine shared by solo play and multiplayer
//! sessions: a target word, the submitted guesses with their verdicts,
//! the in-progress pending guess, and a status that only ever latches
//! forward from `Playing` to `Won` or `Lost`.

use crate::evaluate::{evaluate, Verdict, WORD_LENGTH};
use crate::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of guesses before a board is lost.
pub const MAX_GUESSES: usize = 6;

/// Lifecycle of a board. Transitions only move forward; a terminal
/// status is never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardStatus {
    Playing,
    Won,
    Lost,
}

/// Why a submitted guess was rejected. Rejections never mutate the board,
/// so resubmitting the same malformed guess is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessRejection {
    /// The board is already won or lost.
    #[error("board is no longer playing")]
    Finished,

    /// The guess is not exactly five letters.
    #[error("guess must be exactly {WORD_LENGTH} letters")]
    WrongLength,

    /// The guess is not a dictionary word.
    #[error("not a word in the lexicon")]
    NotAWord,
}

/// Result of an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    /// Per-letter verdicts for the accepted guess.
    pub verdicts: [Verdict; WORD_LENGTH],
    /// Board status after applying the guess.
    pub status: BoardStatus,
}

impl GuessOutcome {
    /// True when this guess solved the board.
    pub fn is_win(&self) -> bool {
        self.status == BoardStatus::Won
    }
}

/// One participant's private puzzle progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    target: String,
    guesses: Vec<String>,
    verdicts: Vec<[Verdict; WORD_LENGTH]>,
    pending: String,
    status: BoardStatus,
    max_guesses: usize,
}

impl Board {
    /// Creates a fresh board for the given target word.
    ///
    /// The target is normalized to lowercase; guesses compare
    /// case-insensitively against it.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into().to_ascii_lowercase(),
            guesses: Vec::new(),
            verdicts: Vec::new(),
            pending: String::new(),
            status: BoardStatus::Playing,
            max_guesses: MAX_GUESSES,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn guesses(&self) -> &[String] {
        &self.guesses
    }

    /// Verdict rows parallel to [`Board::guesses`].
    pub fn verdicts(&self) -> &[[Verdict; WORD_LENGTH]] {
        &self.verdicts
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn max_guesses(&self) -> usize {
        self.max_guesses
    }

    /// Appends a letter to the pending guess.
    ///
    /// Ignored once the pending guess is full or the board is no longer
    /// playing, mirroring how a physical keyboard simply stops working.
    pub fn append_letter(&mut self, letter: char) {
        if self.status != BoardStatus::Playing
            || self.pending.len() >= WORD_LENGTH
            || !letter.is_ascii_alphabetic()
        {
            return;
        }
        self.pending.push(letter.to_ascii_lowercase());
    }

    /// Removes the last letter of the pending guess. No-op when empty.
    pub fn delete_letter(&mut self) {
        if self.status != BoardStatus::Playing {
            return;
        }
        self.pending.pop();
    }

    /// Submits the pending guess, clearing it on acceptance.
    pub fn submit_pending(&mut self, lexicon: &Lexicon) -> Result<GuessOutcome, GuessRejection> {
        let pending = self.pending.clone();
        let outcome = self.submit_guess(&pending, lexicon)?;
        Ok(outcome)
    }

    /// Validates and applies a guess.
    ///
    /// Rejects without mutation unless the board is still playing, the
    /// guess is exactly five letters, and the lexicon accepts it. On
    /// acceptance the guess and its verdicts are appended, the pending
    /// guess is cleared, and the status latches to `Won` on an exact
    /// match or `Lost` on the final miss.
    pub fn submit_guess(
        &mut self,
        guess: &str,
        lexicon: &Lexicon,
    ) -> Result<GuessOutcome, GuessRejection> {
        if self.status != BoardStatus::Playing {
            return Err(GuessRejection::Finished);
        }
        if guess.len() != WORD_LENGTH {
            return Err(GuessRejection::WrongLength);
        }
        if !lexicon.is_legal_guess(guess) {
            return Err(GuessRejection::NotAWord);
        }

        let guess = guess.to_ascii_lowercase();
        let verdicts = evaluate(&guess, &self.target);

        let solved = guess == self.target;
        self.guesses.push(guess);
        self.verdicts.push(verdicts);
        self.pending.clear();

        self.status = if solved {
            BoardStatus::Won
        } else if self.guesses.len() >= self.max_guesses {
            BoardStatus::Lost
        } else {
            BoardStatus::Playing
        };

        Ok(GuessOutcome {
            verdicts,
            status: self.status,
        })
    }
}
