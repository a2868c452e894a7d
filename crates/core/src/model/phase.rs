use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse time-based stage of the interview.
///
/// Phases only ever move forward within a session:
/// `Introduction` → `MainQuestions` → `WrappingUp` → `Conclusion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Opening minutes: greeting and audio check.
    Introduction,
    /// Bulk of the question bank.
    MainQuestions,
    /// Time is getting short; prioritize what is left.
    WrappingUp,
    /// Terminal phase: close the interview.
    Conclusion,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Introduction,
        Phase::MainQuestions,
        Phase::WrappingUp,
        Phase::Conclusion,
    ];

    /// Lower bound (inclusive) of progress percent at which this phase begins.
    #[must_use]
    pub fn starts_at_percent(self) -> f64 {
        match self {
            Phase::Introduction => 0.0,
            Phase::MainQuestions => 15.0,
            Phase::WrappingUp => 75.0,
            Phase::Conclusion => 90.0,
        }
    }

    /// Classifies an unrounded progress percentage.
    ///
    /// Boundaries are `[lower, upper)`, so exactly 15.0 is `MainQuestions`.
    #[must_use]
    pub fn from_progress(progress_percent: f64) -> Self {
        if progress_percent < Phase::MainQuestions.starts_at_percent() {
            Phase::Introduction
        } else if progress_percent < Phase::WrappingUp.starts_at_percent() {
            Phase::MainQuestions
        } else if progress_percent < Phase::Conclusion.starts_at_percent() {
            Phase::WrappingUp
        } else {
            Phase::Conclusion
        }
    }

    /// Position in the one-way phase sequence, starting at 0.
    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            Phase::Introduction => 0,
            Phase::MainQuestions => 1,
            Phase::WrappingUp => 2,
            Phase::Conclusion => 3,
        }
    }

    /// Urgency paired one-to-one with this phase.
    #[must_use]
    pub fn urgency(self) -> Urgency {
        match self {
            Phase::Introduction => Urgency::Relaxed,
            Phase::MainQuestions => Urgency::Normal,
            Phase::WrappingUp => Urgency::Elevated,
            Phase::Conclusion => Urgency::Critical,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Conclusion)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Introduction => "introduction",
            Phase::MainQuestions => "main_questions",
            Phase::WrappingUp => "wrapping_up",
            Phase::Conclusion => "conclusion",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── URGENCY ───────────────────────────────────────────────────────────────────
//

/// Pacing severity label. Advisory only; nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Relaxed,
    Normal,
    Elevated,
    Critical,
}

impl Urgency {
    /// True when the caller should stop probing and move on.
    #[must_use]
    pub fn is_pressing(self) -> bool {
        matches!(self, Urgency::Elevated | Urgency::Critical)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Relaxed => "relaxed",
            Urgency::Normal => "normal",
            Urgency::Elevated => "elevated",
            Urgency::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
