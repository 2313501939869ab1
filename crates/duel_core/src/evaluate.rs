//! Guess evaluation against a target word.
//!
//! This module implements the verdict algorithm both clients and the
//! session coordinator must agree on bit-for-bit. Duplicate letters are
//! handled with a per-letter budget: a repeated letter in the guess can
//! never earn more `Correct`/`Present` marks than its multiplicity in
//! the target.

use serde::{Deserialize, Serialize};

/// Number of letters in every puzzle word and every guess.
pub const WORD_LENGTH: usize = 5;

/// Per-letter evaluation result for a submitted guess.
///
/// Serialized in kebab-case to match the wire format consumed by clients
/// (`correct`, `present`, `absent`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Right letter in the right position.
    Correct,
    /// Letter occurs in the target, but at a different position.
    Present,
    /// Letter does not occur in the target (or its budget is spent).
    Absent,
}

/// Evaluates a guess against a target word, producing one verdict per letter.
///
/// Both inputs must be exactly [`WORD_LENGTH`] characters; comparison is
/// case-insensitive, and characters outside `a-z` never match anything.
/// The algorithm runs in two passes:
///
/// 1. Exact positional matches are marked `Correct` and consume that
///    letter's remaining count in the target.
/// 2. Remaining positions are marked `Present` only while the letter still
///    has budget left, otherwise `Absent`.
///
/// The pass ordering is load-bearing: `Correct` matches always claim the
/// shared letter budget before any `Present` match may consume it.
///
/// This is a pure function: same inputs always give the same verdicts.
pub fn evaluate(guess: &str, target: &str) -> [Verdict; WORD_LENGTH] {
    debug_assert_eq!(guess.chars().count(), WORD_LENGTH);
    debug_assert_eq!(target.chars().count(), WORD_LENGTH);

    let guess: Vec<char> = guess.chars().map(|c| c.to_ascii_lowercase()).collect();
    let target: Vec<char> = target.chars().map(|c| c.to_ascii_lowercase()).collect();

    // Remaining-count budget per target letter (a-z).
    let mut remaining = [0u8; 26];
    for &c in &target {
        if let Some(slot) = letter_slot(c) {
            remaining[slot] += 1;
        }
    }

    let mut verdicts = [Verdict::Absent; WORD_LENGTH];

    // Pass 1: exact matches claim their letter budget first.
    for i in 0..WORD_LENGTH {
        if guess[i] == target[i] {
            verdicts[i] = Verdict::Correct;
            if let Some(slot) = letter_slot(guess[i]) {
                remaining[slot] -= 1;
            }
        }
    }

    // Pass 2: misplaced letters, capped by what is left of the budget.
    for i in 0..WORD_LENGTH {
        if verdicts[i] == Verdict::Correct {
            continue;
        }
        let Some(slot) = letter_slot(guess[i]) else {
            continue;
        };
        if remaining[slot] > 0 {
            verdicts[i] = Verdict::Present;
            remaining[slot] -= 1;
        }
    }

    verdicts
}

/// Budget index for a lowercase ASCII letter. Anything else holds no
/// budget and can never match.
fn letter_slot(c: char) -> Option<usize> {
    c.is_ascii_lowercase().then(|| (c as u8 - b'a') as usize)
}
