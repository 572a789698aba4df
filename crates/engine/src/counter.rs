//! Remaining-character counter for bounded text fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How close a field is to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterLevel {
    /// Plenty of room left.
    Normal,
    /// Approaching the limit.
    Caution,
    /// Nearly at the limit.
    Critical,
}

impl CounterLevel {
    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Caution => "caution",
            Self::Critical => "critical",
        }
    }
}

/// Thresholds for [`CounterLevel`]; a level applies when remaining is below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterThresholds {
    /// Limit in characters.
    pub max_length: usize,
    /// `Caution` below this many remaining.
    pub caution_below: usize,
    /// `Critical` below this many remaining.
    pub critical_below: usize,
}

impl Default for CounterThresholds {
    fn default() -> Self {
        Self {
            max_length: 1000,
            caution_below: 100,
            critical_below: 50,
        }
    }
}

/// Snapshot of a field's length against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCount {
    /// Characters entered.
    pub used: usize,
    /// Characters left (never negative).
    pub remaining: usize,
    /// Severity derived from `remaining`.
    pub level: CounterLevel,
}

impl fmt::Display for CharacterCount {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} characters remaining", self.remaining)
    }
}

/// Count characters in `text` against `thresholds`.
#[must_use]
pub fn count(text: &str, thresholds: CounterThresholds) -> CharacterCount {
    let used = text.chars().count();
    let remaining = thresholds.max_length.saturating_sub(used);
    let level = if remaining < thresholds.critical_below {
        CounterLevel::Critical
    } else if remaining < thresholds.caution_below {
        CounterLevel::Caution
    } else {
        CounterLevel::Normal
    };
    CharacterCount {
        used,
        remaining,
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_remaining() {
        let limits = CounterThresholds::default();
        assert_eq!(count("", limits).level, CounterLevel::Normal);
        assert_eq!(count(&"a".repeat(900), limits).level, CounterLevel::Normal);
        assert_eq!(count(&"a".repeat(901), limits).level, CounterLevel::Caution);
        assert_eq!(count(&"a".repeat(951), limits).level, CounterLevel::Critical);
    }

    #[test]
    fn remaining_saturates_past_limit() {
        let snapshot = count(&"a".repeat(1200), CounterThresholds::default());
        assert_eq!(snapshot.used, 1200);
        assert_eq!(snapshot.remaining, 0);
        assert_eq!(snapshot.to_string(), "0 characters remaining");
    }

    #[test]
    fn renders_remaining_text() {
        let snapshot = count("hello", CounterThresholds::default());
        assert_eq!(snapshot.to_string(), "995 characters remaining");
    }
}
