use std::fmt;

use crate::session::{abs_diff, Session};

const MS_IN_SECOND: u64 = 1000;
const MS_IN_MINUTE: u64 = 60 * MS_IN_SECOND;
const MS_IN_HOUR: u64 = 60 * MS_IN_MINUTE;
const MS_IN_DAY: u64 = 24 * MS_IN_HOUR;

/// Typing speed in words per minute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speed {
    Wpm(u64),
    /// the attempt took less than one whole second, so there is nothing to divide by
    Unbounded,
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speed::Wpm(wpm) => write!(f, "{wpm} wpm"),
            Speed::Unbounded => write!(f, "∞ wpm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// Only a finished session has both timestamps and at least one keystroke.
    #[error("session has not finished")]
    NotFinished,
}

/// Results of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    /// percentage, 0-100
    pub accuracy: u32,
    pub speed: Speed,
    pub duration_text: String,
    pub elapsed_ms: u64,
}

impl Stats {
    pub fn compute(session: &Session) -> Result<Self, StatsError> {
        let (true, Some(start), Some(end), Some(accuracy)) = (
            session.is_finished(),
            session.started_at(),
            session.finished_at(),
            accuracy(session.typed_count(), session.incorrect_count()),
        ) else {
            return Err(StatsError::NotFinished);
        };
        let elapsed_ms = abs_diff(start, end).as_millis() as u64;

        Ok(Self {
            accuracy,
            speed: speed(word_count(session.text()), elapsed_ms),
            duration_text: format_duration(elapsed_ms),
            elapsed_ms,
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}   {}% acc   {}",
            self.speed, self.accuracy, self.duration_text
        )
    }
}

/// Share of keystrokes that were correct when typed, rounded to a whole percent.
/// `None` when nothing was typed.
pub fn accuracy(typed: usize, incorrect: usize) -> Option<u32> {
    if typed == 0 {
        return None;
    }

    let correct = typed.saturating_sub(incorrect);
    Some(((correct as f64 * 100.0) / typed as f64).round() as u32)
}

/// Naive space-delimited word count; runs of spaces yield empty words that still count.
pub fn word_count(text: &str) -> usize {
    text.split(' ').count()
}

/// Words per minute over whole elapsed seconds.
pub fn speed(words: usize, elapsed_ms: u64) -> Speed {
    let elapsed_secs = elapsed_ms / MS_IN_SECOND;
    if elapsed_secs == 0 {
        return Speed::Unbounded;
    }

    Speed::Wpm(((words as f64 * 60.0) / elapsed_secs as f64).round() as u64)
}

/// Render an elapsed time by magnitude: "N day(s)", "HH:MM:SS", "MM:SS" or "00:SS".
pub fn format_duration(ms: u64) -> String {
    let days = ms / MS_IN_DAY;
    let hours = ms / MS_IN_HOUR;
    let minutes = ms / MS_IN_MINUTE;
    let seconds = ms / MS_IN_SECOND;

    if days >= 1 {
        format!("{} day{}", days, if days > 1 { "s" } else { "" })
    } else if hours >= 1 {
        let minutes_left = (ms % MS_IN_HOUR) / MS_IN_MINUTE;
        let seconds_left = ((ms % MS_IN_HOUR) % MS_IN_MINUTE) / MS_IN_SECOND;
        format!("{hours:02}:{minutes_left:02}:{seconds_left:02}")
    } else if minutes >= 1 {
        let seconds_left = (ms % MS_IN_MINUTE) / MS_IN_SECOND;
        format!("{minutes:02}:{seconds_left:02}")
    } else {
        format!("00:{seconds:02}")
    }
}
