use std::time::{Duration, SystemTime};

use tracing::{debug, trace};

use crate::keys::Key;
use crate::quotes::FALLBACK_TEXT;

/// Judgment of a single character of the target text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum_macros::Display)]
pub enum CharState {
    #[default]
    Untyped,
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum SessionPhase {
    Idle,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid input: target text must not be empty")]
    EmptyTarget,
}

/// What a single key did to the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEffect {
    Ignored,
    Judged {
        index: usize,
        state: CharState,
        /// this key moved the pointer onto the end of the target
        finished: bool,
    },
    Erased {
        index: usize,
    },
}

impl KeyEffect {
    pub fn finished_session(&self) -> bool {
        matches!(self, KeyEffect::Judged { finished: true, .. })
    }
}

/// One attempt at typing a fixed target text
#[derive(Debug, Clone)]
pub struct Session {
    text: String,
    target: Vec<char>,
    states: Vec<CharState>,
    pointer: usize,
    started_at: Option<SystemTime>,
    finished_at: Option<SystemTime>,
    typed_count: usize,
    incorrect_count: usize,
}

impl Session {
    pub fn new(text: impl Into<String>) -> Result<Self, SessionError> {
        let text = text.into();
        if text.is_empty() {
            return Err(SessionError::EmptyTarget);
        }

        Ok(Self::from_non_empty(text))
    }

    fn from_non_empty(text: String) -> Self {
        let target: Vec<char> = text.chars().collect();
        let states = vec![CharState::Untyped; target.len()];

        Self {
            text,
            target,
            states,
            pointer: 0,
            started_at: None,
            finished_at: None,
            typed_count: 0,
            incorrect_count: 0,
        }
    }

    /// A fresh, idle session over the same target text
    pub fn restarted(&self) -> Self {
        Self::from_non_empty(self.text.clone())
    }

    pub fn apply_key(&mut self, key: Key) -> KeyEffect {
        self.apply_key_at(key, SystemTime::now())
    }

    /// Apply a key using `now` as the wall clock reading for any timer boundary it crosses.
    pub fn apply_key_at(&mut self, key: Key, now: SystemTime) -> KeyEffect {
        if self.is_finished() {
            return KeyEffect::Ignored;
        }

        match key {
            Key::Char(c) => self.write(c, now),
            Key::Backspace => self.backspace(),
            // Escape is a controller concern
            Key::Escape | Key::Other => KeyEffect::Ignored,
        }
    }

    fn write(&mut self, c: char, now: SystemTime) -> KeyEffect {
        self.typed_count += 1;
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        let index = self.pointer;
        let state = if c == self.target[index] {
            CharState::Correct
        } else {
            self.incorrect_count += 1;
            CharState::Incorrect
        };
        self.states[index] = state;
        self.pointer += 1;

        trace!(index, %state, "judged keystroke");

        let finished = self.is_finished();
        if finished {
            self.finished_at = Some(now);
            debug!(
                typed = self.typed_count,
                incorrect = self.incorrect_count,
                "session finished"
            );
        }

        KeyEffect::Judged {
            index,
            state,
            finished,
        }
    }

    fn backspace(&mut self) -> KeyEffect {
        if self.pointer == 0 {
            return KeyEffect::Ignored;
        }

        self.pointer -= 1;
        self.states[self.pointer] = CharState::Untyped;
        trace!(index = self.pointer, "erased");

        KeyEffect::Erased {
            index: self.pointer,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.pointer == self.target.len()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_finished() {
            SessionPhase::Finished
        } else if self.started_at.is_some() {
            SessionPhase::InProgress
        } else {
            SessionPhase::Idle
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn states(&self) -> &[CharState] {
        &self.states
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<SystemTime> {
        self.finished_at
    }

    pub fn typed_count(&self) -> usize {
        self.typed_count
    }

    pub fn incorrect_count(&self) -> usize {
        self.incorrect_count
    }

    /// Time spent so far: zero before the first keystroke, frozen once finished.
    pub fn elapsed_at(&self, now: SystemTime) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => abs_diff(start, end),
            (Some(start), None) => abs_diff(start, now),
            _ => Duration::ZERO,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(SystemTime::now())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_non_empty(FALLBACK_TEXT.to_string())
    }
}

/// Absolute difference between two wall clock readings
pub fn abs_diff(a: SystemTime, b: SystemTime) -> Duration {
    match b.duration_since(a) {
        Ok(d) => d,
        Err(e) => e.duration(),
    }
}
