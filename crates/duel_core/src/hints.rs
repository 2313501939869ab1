//! Keyboard hint aggregation.
//!
//! Tracks the best verdict seen so far for each letter across all of a
//! board's guesses, with upgrade-only precedence
//! `correct > present > absent > unseen`. Clients use this to shade
//! their on-screen keyboard.

use crate::evaluate::{Verdict, WORD_LENGTH};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Letter → best-seen verdict aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyboardHints {
    letters: HashMap<char, Verdict>,
}

impl KeyboardHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one evaluated guess into the aggregate.
    ///
    /// Each letter's hint may only upgrade: `Correct` is never
    /// downgraded, and `Present` only replaces `Absent` or unseen.
    pub fn record(&mut self, guess: &str, verdicts: &[Verdict; WORD_LENGTH]) {
        for (letter, &verdict) in guess.chars().zip(verdicts.iter()) {
            let letter = letter.to_ascii_lowercase();
            let entry = self.letters.entry(letter).or_insert(verdict);
            if rank(verdict) > rank(*entry) {
                *entry = verdict;
            }
        }
    }

    /// The best verdict seen for a letter, or `None` if unseen.
    pub fn hint(&self, letter: char) -> Option<Verdict> {
        self.letters.get(&letter.to_ascii_lowercase()).copied()
    }
}

fn rank(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Absent => 0,
        Verdict::Present => 1,
        Verdict::Correct => 2,
    }
}
