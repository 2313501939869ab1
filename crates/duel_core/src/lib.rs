//! # duel_core - Word-Duel Game Logic
//!
//! Pure game logic for the word-duel guessing game: no I/O, no async, no
//! server state. Everything the multiplayer coordinator and a client must
//! agree on bit-for-bit lives here:
//!
//! * **Guess evaluation** - the two-pass, duplicate-aware verdict algorithm
//! * **Lexicon** - the legal-word oracle and random target picker
//! * **Board** - one participant's guess-by-guess state machine
//! * **Keyboard hints** - upgrade-only letter shading for clients
//! * **Solo rounds** - single-player play, tracked entirely client-side
//!
//! The multiplayer session coordinator in `duel_server` builds on these
//! types; it owns the boards and serializes intents, while this crate
//! guarantees that applying the same guesses in the same order always
//! yields the same verdicts and statuses.

pub mod board;
pub mod evaluate;
pub mod hints;
pub mod lexicon;
pub mod solo;

pub use board::{Board, BoardStatus, GuessOutcome, GuessRejection, MAX_GUESSES};
pub use evaluate::{evaluate, Verdict, WORD_LENGTH};
pub use hints::KeyboardHints;
pub use lexicon::{Lexicon, LexiconError};
pub use solo::SoloRound;
