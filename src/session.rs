//! Game session state machine.
//!
//! A session is `Playing` until a guess equals the secret, then `Won` and frozen
//! until [`GameSession::restart`] or [`GameSession::change_difficulty`] draws a
//! fresh secret. Invalid input never touches the counters.

use std::num::IntErrorKind;

use chrono::{DateTime, Utc};
use log::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::hint;
use crate::random::RandomSource;
use crate::score::HighScoreBook;
use crate::store::KeyValueStore;

pub const READY_MESSAGE: &str = "Make a guess...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Playing,
    Won,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuessRecord {
    pub value: u32,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    #[error("Please enter a whole number.")]
    InvalidFormat,
    #[error("Enter a number between 1 and {max}.")]
    OutOfRange { max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    TooHigh,
    TooLow,
    /// Win event. `new_high_score` is set when this win beat the record.
    Correct { secret: u32, new_high_score: bool },
    /// Submission after the session was already won; nothing changed.
    AlreadyWon,
}

impl GuessOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, GuessOutcome::Correct { .. })
    }
}

/// Read-only view handed to the presentation layer. The secret is left out.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SessionSnapshot {
    pub difficulty: Difficulty,
    pub max_number: u32,
    pub attempts: u32,
    pub high_score: Option<u32>,
    pub guess_history: Vec<GuessRecord>,
    pub status: Status,
    pub wrong_guesses: u32,
    pub hints_used: u32,
    pub current_hint: Option<String>,
    pub feedback: String,
    pub hint_available: bool,
}

pub struct GameSession {
    config: GameConfig,
    rng: Box<dyn RandomSource>,
    scores: HighScoreBook,
    difficulty: Difficulty,
    secret: u32,
    attempts: u32,
    wrong_guesses: u32,
    history: Vec<GuessRecord>,
    status: Status,
    hints_used: u32,
    current_hint: Option<String>,
    feedback: String,
    high_score: Option<u32>,
}

impl GameSession {
    /// Builds the collaborators and starts a session at `config.difficulty`.
    pub fn new(
        config: GameConfig,
        rng: Box<dyn RandomSource>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let scores = HighScoreBook::new(store, config.key_prefix.clone());
        let difficulty = config.difficulty;
        let mut session = Self {
            config,
            rng,
            scores,
            difficulty,
            secret: 1,
            attempts: 0,
            wrong_guesses: 0,
            history: Vec::new(),
            status: Status::Playing,
            hints_used: 0,
            current_hint: None,
            feedback: READY_MESSAGE.to_string(),
            high_score: None,
        };
        session.initialize(difficulty);
        session
    }

    pub fn initialize(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.secret = self.rng.between(1, difficulty.max_number());
        self.attempts = 0;
        self.wrong_guesses = 0;
        self.history.clear();
        self.status = Status::Playing;
        self.hints_used = 0;
        self.current_hint = None;
        self.feedback = READY_MESSAGE.to_string();
        self.high_score = self.scores.load(difficulty);
        debug!(
            "new {} session (1-{}), best {:?}",
            difficulty,
            difficulty.max_number(),
            self.high_score
        );
    }

    pub fn restart(&mut self) {
        self.initialize(self.difficulty);
    }

    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.initialize(difficulty);
    }

    fn parse_guess(&self, raw: &str) -> Result<u32, GuessError> {
        let max = self.max_number();
        let value = match raw.trim().parse::<i64>() {
            Ok(v) => v,
            Err(e) => {
                return match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        Err(GuessError::OutOfRange { max })
                    }
                    _ => Err(GuessError::InvalidFormat),
                };
            }
        };
        if value < 1 || value > max as i64 {
            return Err(GuessError::OutOfRange { max });
        }
        Ok(value as u32)
    }

    pub fn submit_guess(&mut self, raw: &str) -> Result<GuessOutcome, GuessError> {
        if self.status == Status::Won {
            return Ok(GuessOutcome::AlreadyWon);
        }
        let guess = match self.parse_guess(raw) {
            Ok(g) => g,
            Err(e) => {
                self.feedback = e.to_string();
                return Err(e);
            }
        };

        self.attempts += 1;
        self.history.insert(
            0,
            GuessRecord {
                value: guess,
                time: Utc::now(),
            },
        );
        if self.config.clear_hint_on_guess {
            self.current_hint = None;
        }

        if guess == self.secret {
            self.status = Status::Won;
            self.feedback = format!("Correct! It was {}", self.secret);
            let new_high_score = self.scores.record_win(self.difficulty, self.attempts);
            if new_high_score {
                self.high_score = Some(self.attempts);
            }
            info!(
                "won {} in {} attempts (best {:?})",
                self.difficulty, self.attempts, self.high_score
            );
            return Ok(GuessOutcome::Correct {
                secret: self.secret,
                new_high_score,
            });
        }

        self.wrong_guesses += 1;
        if guess > self.secret {
            self.feedback = "Too High!".to_string();
            Ok(GuessOutcome::TooHigh)
        } else {
            self.feedback = "Too Low!".to_string();
            Ok(GuessOutcome::TooLow)
        }
    }

    /// Answers for any secret regardless of the hint threshold; gating the
    /// button is up to the caller (see [`GameSession::hint_available`]).
    pub fn request_hint(&mut self) -> String {
        let text = hint::pick(self.secret, self.rng.as_mut());
        self.hints_used += 1;
        self.current_hint = Some(text.clone());
        debug!("hint #{}: {}", self.hints_used, text);
        text
    }

    pub fn hint_available(&self) -> bool {
        self.status == Status::Playing && self.wrong_guesses >= self.config.hint_threshold
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn max_number(&self) -> u32 {
        self.difficulty.max_number()
    }

    pub fn secret_number(&self) -> u32 {
        self.secret
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn high_score(&self) -> Option<u32> {
        self.high_score
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn current_hint(&self) -> Option<&str> {
        self.current_hint.as_deref()
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            difficulty: self.difficulty,
            max_number: self.max_number(),
            attempts: self.attempts,
            high_score: self.high_score,
            guess_history: self.history.clone(),
            status: self.status,
            wrong_guesses: self.wrong_guesses,
            hints_used: self.hints_used,
            current_hint: self.current_hint.clone(),
            feedback: self.feedback.clone(),
            hint_available: self.hint_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    /// Always draws `secret` (clamped into range) and hint index 0.
    struct Rigged(u32);

    impl RandomSource for Rigged {
        fn between(&mut self, low: u32, high: u32) -> u32 {
            self.0.clamp(low, high)
        }
        fn index(&mut self, _len: usize) -> usize {
            0
        }
    }

    fn session(secret: u32, difficulty: Difficulty) -> GameSession {
        let config = GameConfig {
            difficulty,
            ..GameConfig::default()
        };
        GameSession::new(config, Box::new(Rigged(secret)), Box::new(MemoryStore::new()))
    }

    #[test]
    fn fresh_session_is_ready() {
        let s = session(42, Difficulty::Medium);
        assert_eq!(s.status(), Status::Playing);
        assert_eq!(s.attempts(), 0);
        assert_eq!(s.feedback(), READY_MESSAGE);
        assert_eq!(s.high_score(), None);
        assert!(s.history().is_empty());
        assert!(!s.hint_available());
    }

    #[test]
    fn whitespace_is_trimmed() {
        let mut s = session(42, Difficulty::Medium);
        assert_eq!(s.submit_guess(" 42\n"), Ok(GuessOutcome::Correct {
            secret: 42,
            new_high_score: true
        }));
    }

    #[test]
    fn empty_and_decimal_inputs_are_invalid_format() {
        let mut s = session(42, Difficulty::Medium);
        assert_eq!(s.submit_guess(""), Err(GuessError::InvalidFormat));
        assert_eq!(s.submit_guess("4.5"), Err(GuessError::InvalidFormat));
        assert_eq!(s.feedback(), "Please enter a whole number.");
        assert_eq!(s.attempts(), 0);
    }

    #[test]
    fn zero_negative_and_huge_are_out_of_range() {
        let mut s = session(42, Difficulty::Medium);
        for raw in ["0", "-3", "101", "99999999999999999999999"] {
            assert_eq!(
                s.submit_guess(raw),
                Err(GuessError::OutOfRange { max: 100 }),
                "input {}",
                raw
            );
        }
        assert_eq!(s.feedback(), "Enter a number between 1 and 100.");
        assert_eq!(s.attempts(), 0);
        assert_eq!(s.wrong_guesses(), 0);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut s = session(42, Difficulty::Medium);
        s.submit_guess("10").unwrap();
        s.submit_guess("90").unwrap();
        s.submit_guess("42").unwrap();
        let values: Vec<u32> = s.history().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![42, 90, 10]);
        assert!(s.history()[0].time >= s.history()[2].time);
    }

    #[test]
    fn hint_becomes_available_after_threshold() {
        let mut s = session(42, Difficulty::Medium);
        s.submit_guess("1").unwrap();
        s.submit_guess("2").unwrap();
        assert!(!s.hint_available());
        s.submit_guess("3").unwrap();
        assert!(s.hint_available());
        s.submit_guess("42").unwrap();
        assert!(!s.hint_available());
    }

    #[test]
    fn hint_persists_across_guesses_by_default() {
        let mut s = session(16, Difficulty::Easy);
        let hint = s.request_hint();
        assert_eq!(hint, hint::PERFECT_SQUARE);
        s.submit_guess("20").unwrap();
        assert_eq!(s.current_hint(), Some(hint::PERFECT_SQUARE));
        assert_eq!(s.hints_used(), 1);
    }

    #[test]
    fn hint_cleared_on_guess_when_configured() {
        let config = GameConfig {
            difficulty: Difficulty::Easy,
            clear_hint_on_guess: true,
            ..GameConfig::default()
        };
        let mut s = GameSession::new(config, Box::new(Rigged(16)), Box::new(MemoryStore::new()));
        s.request_hint();
        // invalid input keeps the hint
        let _ = s.submit_guess("x");
        assert!(s.current_hint().is_some());
        s.submit_guess("20").unwrap();
        assert_eq!(s.current_hint(), None);
    }

    #[test]
    fn restart_resets_counters_and_keeps_difficulty() {
        let mut s = session(7, Difficulty::Easy);
        s.submit_guess("3").unwrap();
        s.request_hint();
        s.restart();
        assert_eq!(s.difficulty(), Difficulty::Easy);
        assert_eq!(s.attempts(), 0);
        assert_eq!(s.wrong_guesses(), 0);
        assert_eq!(s.hints_used(), 0);
        assert_eq!(s.current_hint(), None);
        assert_eq!(s.feedback(), READY_MESSAGE);
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut s = session(42, Difficulty::Medium);
        s.submit_guess("50").unwrap();
        let snap = s.snapshot();
        assert_eq!(snap.difficulty, Difficulty::Medium);
        assert_eq!(snap.max_number, 100);
        assert_eq!(snap.attempts, 1);
        assert_eq!(snap.wrong_guesses, 1);
        assert_eq!(snap.feedback, "Too High!");
        assert_eq!(snap.status, Status::Playing);
        assert_eq!(snap.guess_history.len(), 1);
        assert!(!snap.hint_available);
    }
}
