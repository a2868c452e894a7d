use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::config::PacingConfig;
use crate::model::phase::{Phase, Urgency};
use crate::time::whole_minutes_between;

/// Point-in-time pacing status of an interview.
///
/// Recomputed on every query and never stored. Serializes to the flat JSON
/// object voice agents consume:
///
/// ```json
/// {
///   "elapsedMinutes": 15,
///   "remainingMinutes": 45,
///   "progressPercent": 25,
///   "phase": "main_questions",
///   "urgency": "normal",
///   "recommendation": "...",
///   "currentTime": "2023-11-14T22:28:20Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    elapsed_minutes: u32,
    remaining_minutes: u32,
    progress_percent: u32,
    phase: Phase,
    urgency: Urgency,
    recommendation: String,
    current_time: DateTime<Utc>,
    #[serde(skip)]
    questions_remaining: Option<u32>,
}

impl StatusSnapshot {
    /// Computes the snapshot for a session started at `started_at`, observed at `now`.
    ///
    /// Phase and urgency are classified from the unrounded progress ratio; only
    /// the reported `progress_percent` is rounded.
    #[must_use]
    pub fn compute(config: &PacingConfig, started_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = config.total_duration_minutes();
        let elapsed_minutes = whole_minutes_between(started_at, now);
        let remaining_minutes = total.saturating_sub(elapsed_minutes);
        let progress = f64::from(elapsed_minutes) * 100.0 / f64::from(total);

        let phase = Phase::from_progress(progress);
        let questions_remaining = match phase {
            Phase::MainQuestions => Some(estimate_questions_remaining(config, progress)),
            _ => None,
        };

        Self {
            elapsed_minutes,
            remaining_minutes,
            progress_percent: round_percent(progress),
            phase,
            urgency: phase.urgency(),
            recommendation: recommendation(phase, questions_remaining),
            current_time: now,
            questions_remaining,
        }
    }

    #[must_use]
    pub fn elapsed_minutes(&self) -> u32 {
        self.elapsed_minutes
    }

    #[must_use]
    pub fn remaining_minutes(&self) -> u32 {
        self.remaining_minutes
    }

    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        self.progress_percent
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    #[must_use]
    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    #[must_use]
    pub fn current_time(&self) -> DateTime<Utc> {
        self.current_time
    }

    /// Advisory estimate of questions left; only present during `MainQuestions`.
    #[must_use]
    pub fn questions_remaining(&self) -> Option<u32> {
        self.questions_remaining
    }

    /// True if both snapshots agree on everything but `current_time`.
    #[must_use]
    pub fn same_pacing(&self, other: &StatusSnapshot) -> bool {
        self.elapsed_minutes == other.elapsed_minutes
            && self.remaining_minutes == other.remaining_minutes
            && self.progress_percent == other.progress_percent
            && self.phase == other.phase
            && self.urgency == other.urgency
            && self.recommendation == other.recommendation
    }
}

/// Nominal questions left if each one takes an equal share of the time.
///
/// With the default bank this is `ceil((100 - progress) / 10)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn estimate_questions_remaining(config: &PacingConfig, progress: f64) -> u32 {
    let left = ((100.0 - progress) * f64::from(config.total_questions()) / 100.0).ceil();
    if left <= 0.0 { 0 } else { left as u32 }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_percent(progress: f64) -> u32 {
    progress.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

fn recommendation(phase: Phase, questions_remaining: Option<u32>) -> String {
    match phase {
        Phase::Introduction => "Interview is just getting started. Keep the opening warm, \
            confirm the candidate can hear you clearly, and take your time; there is no \
            time pressure yet."
            .to_string(),
        Phase::MainQuestions => {
            let left = questions_remaining.unwrap_or(0);
            let noun = if left == 1 { "question" } else { "questions" };
            format!(
                "Interview is in the main question phase with roughly {left} {noun} left \
                 at the current pace. Balance follow-up depth against covering the \
                 remaining questions."
            )
        }
        Phase::WrappingUp => "Time is getting short. Focus on the remaining key questions \
            and only dig deeper where there is a critical gap."
            .to_string(),
        Phase::Conclusion => "Interview time is nearly up. Wrap up the current topic \
            immediately and move on to closing remarks."
            .to_string(),
    }
}
