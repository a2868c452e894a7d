use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("interview duration must be > 0 minutes")]
    InvalidDuration,

    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("question count ({questions}) cannot exceed interview minutes ({minutes})")]
    TooManyQuestions { questions: u32, minutes: u32 },
}

//
// ─── PACING CONFIG ─────────────────────────────────────────────────────────────
//

/// Fixed pacing parameters for one interview.
///
/// `total_questions` only feeds the remaining-question estimate; it is never
/// enforced as a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    total_duration_minutes: u32,
    total_questions: u32,
}

impl PacingConfig {
    pub const DEFAULT_DURATION_MINUTES: u32 = 60;
    pub const DEFAULT_TOTAL_QUESTIONS: u32 = 10;

    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either value is zero or there are more
    /// questions than minutes.
    pub fn new(total_duration_minutes: u32, total_questions: u32) -> Result<Self, ConfigError> {
        if total_duration_minutes == 0 {
            return Err(ConfigError::InvalidDuration);
        }
        if total_questions == 0 {
            return Err(ConfigError::InvalidQuestionCount);
        }
        if total_questions > total_duration_minutes {
            return Err(ConfigError::TooManyQuestions {
                questions: total_questions,
                minutes: total_duration_minutes,
            });
        }

        Ok(Self {
            total_duration_minutes,
            total_questions,
        })
    }

    #[must_use]
    pub fn total_duration_minutes(&self) -> u32 {
        self.total_duration_minutes
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            total_duration_minutes: Self::DEFAULT_DURATION_MINUTES,
            total_questions: Self::DEFAULT_TOTAL_QUESTIONS,
        }
    }
}
