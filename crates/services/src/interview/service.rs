use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use interview_core::model::{Question, QuestionBank, SessionId};
use tracing::{info, warn};

use super::progress::InterviewProgress;
use super::turn::InterviewTurn;
use crate::error::InterviewError;
use crate::pacing_tracker::PacingTracker;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed interview: walks the question bank in order and pairs each
/// question with the tracker's pacing snapshot.
///
/// The question index here is the real position in the bank. It is never fed
/// back into the tracker, whose remaining-question figure stays a time-based
/// estimate.
pub struct InterviewSession {
    id: SessionId,
    bank: QuestionBank,
    tracker: Arc<PacingTracker>,
    current: usize,
    started_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    #[must_use]
    pub fn new(bank: QuestionBank, tracker: Arc<PacingTracker>) -> Self {
        let id = SessionId::new();
        tracker.bind_session(id);
        Self {
            id,
            bank,
            tracker,
            current: 0,
            started_at: None,
        }
    }

    /// Build a session from raw `(topic, text)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `InterviewError::QuestionBank` if the pairs do not form a valid bank.
    pub fn from_entries<I, T, Q>(entries: I, tracker: Arc<PacingTracker>) -> Result<Self, InterviewError>
    where
        I: IntoIterator<Item = (T, Q)>,
        T: Into<String>,
        Q: Into<String>,
    {
        let bank = QuestionBank::new(entries)?;
        Ok(Self::new(bank, tracker))
    }

    /// Replace the generated id; the tracker's log lines follow it.
    #[must_use]
    pub fn with_id(mut self, id: SessionId) -> Self {
        self.tracker.bind_session(id);
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn tracker(&self) -> &PacingTracker {
        &self.tracker
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Start (or restart) the interview at the first question.
    pub fn begin(&mut self) -> Option<&Question> {
        let now = self.tracker.clock().now();
        self.begin_at(now)
    }

    /// Start (or restart) the interview at an explicit instant.
    pub fn begin_at(&mut self, now: DateTime<Utc>) -> Option<&Question> {
        self.tracker.mark_session_start_at(now);
        self.started_at = Some(now);
        self.current = 0;
        info!(session_id = %self.id, questions = self.bank.len(), "interview started");
        self.current_question()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.bank.get(self.current)
    }

    /// Advance to the next question in the bank.
    ///
    /// # Errors
    ///
    /// Returns `InterviewError::Completed` once every question has been asked;
    /// the session stays complete after that.
    pub fn next_question(&mut self) -> Result<&Question, InterviewError> {
        if self.is_complete() {
            warn!(session_id = %self.id, "next question requested after the bank was exhausted");
            return Err(InterviewError::Completed);
        }

        self.current += 1;
        match self.bank.get(self.current) {
            Some(question) => {
                info!(
                    session_id = %self.id,
                    question = question.index + 1,
                    topic = %question.topic,
                    "moving to next question"
                );
                Ok(question)
            }
            None => {
                info!(session_id = %self.id, "question bank exhausted");
                Err(InterviewError::Completed)
            }
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.bank.len()
    }

    #[must_use]
    pub fn progress(&self) -> InterviewProgress {
        let total = self.bank.len();
        let asked = if self.started_at.is_some() || self.current > 0 {
            (self.current + 1).min(total)
        } else {
            0
        };
        InterviewProgress {
            total,
            asked,
            remaining: total.saturating_sub(asked),
            is_complete: self.is_complete(),
        }
    }

    /// Current question plus pacing, the per-question call a voice agent makes.
    #[must_use]
    pub fn turn(&self) -> InterviewTurn {
        self.turn_at(self.tracker.clock().now())
    }

    #[must_use]
    pub fn turn_at(&self, now: DateTime<Utc>) -> InterviewTurn {
        let question = self.current_question().cloned();
        InterviewTurn {
            session_id: self.id,
            question_number: question.as_ref().map(|q| q.index + 1),
            question,
            status: self.tracker.status_at(now),
        }
    }

    /// Advisory: true when pacing urgency is elevated or critical.
    #[must_use]
    pub fn should_move_on(&self) -> bool {
        self.tracker.status().urgency().is_pressing()
    }
}

impl fmt::Debug for InterviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterviewSession")
            .field("id", &self.id)
            .field("questions_len", &self.bank.len())
            .field("current", &self.current)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Clock;
    use chrono::Duration;
    use interview_core::model::{Phase, Urgency};
    use interview_core::time::fixed_now;

    fn session_with(entries: &[(&str, &str)]) -> InterviewSession {
        let tracker = Arc::new(PacingTracker::new().with_clock(Clock::fixed(fixed_now())));
        InterviewSession::from_entries(entries.iter().copied(), tracker).unwrap()
    }

    #[test]
    fn begin_returns_first_question_and_starts_clock() {
        let mut session = session_with(&[("a", "first"), ("b", "second")]);
        let first = session.begin().cloned().unwrap();
        assert_eq!(first.text, "first");
        assert_eq!(session.tracker().started_at(), Some(fixed_now()));
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn walks_bank_in_order_then_completes() {
        let mut session = session_with(&[("a", "first"), ("b", "second")]);
        session.begin();
        assert_eq!(session.next_question().unwrap().text, "second");
        assert!(!session.is_complete());

        assert!(matches!(session.next_question(), Err(InterviewError::Completed)));
        assert!(session.is_complete());
        assert!(session.current_question().is_none());
        assert!(matches!(session.next_question(), Err(InterviewError::Completed)));
    }

    #[test]
    fn progress_counts_asked_questions() {
        let mut session = session_with(&[("a", "1"), ("b", "2"), ("c", "3")]);
        assert_eq!(session.progress().asked, 0);

        session.begin();
        let p = session.progress();
        assert_eq!((p.total, p.asked, p.remaining, p.is_complete), (3, 1, 2, false));

        session.next_question().unwrap();
        session.next_question().unwrap();
        let p = session.progress();
        assert_eq!((p.asked, p.remaining), (3, 0));
        assert!(!p.is_complete);

        let _ = session.next_question();
        assert!(session.progress().is_complete);
    }

    #[test]
    fn turn_pairs_question_with_pacing() {
        let mut session = session_with(&[("a", "first"), ("b", "second")]);
        let start = fixed_now();
        session.begin_at(start);

        let turn = session.turn_at(start + Duration::minutes(50));
        assert_eq!(turn.session_id, session.id());
        assert_eq!(turn.question_number, Some(1));
        assert_eq!(turn.question.as_ref().unwrap().text, "first");
        assert_eq!(turn.status.phase(), Phase::WrappingUp);
        assert_eq!(turn.status.urgency(), Urgency::Elevated);
        assert!(turn.should_move_on());
    }

    #[test]
    fn turn_after_completion_has_no_question() {
        let mut session = session_with(&[("a", "only")]);
        session.begin();
        let _ = session.next_question();

        let turn = session.turn();
        assert_eq!(turn.question, None);
        assert_eq!(turn.question_number, None);
        assert_eq!(turn.status.phase(), Phase::Introduction);
        assert!(!turn.should_move_on());
        assert!(!session.should_move_on());
    }

    #[test]
    fn begin_again_restarts_clock_and_index() {
        let mut session = session_with(&[("a", "first"), ("b", "second")]);
        let start = fixed_now();
        session.begin_at(start);
        session.next_question().unwrap();

        let restart = start + Duration::minutes(30);
        assert_eq!(session.begin_at(restart).unwrap().text, "first");
        assert_eq!(session.turn_at(restart).status.elapsed_minutes(), 0);
    }

    #[test]
    fn tracker_logs_under_the_session_id() {
        let session = session_with(&[("a", "first")]);
        assert_eq!(session.tracker().session_id(), Some(session.id()));

        let id = SessionId::new();
        let session = session.with_id(id);
        assert_eq!(session.id(), id);
        assert_eq!(session.tracker().session_id(), Some(id));
    }

    #[test]
    fn from_entries_rejects_blank_bank() {
        let tracker = Arc::new(PacingTracker::new());
        let empty: Vec<(&str, &str)> = Vec::new();
        let err = InterviewSession::from_entries(empty, tracker).unwrap_err();
        assert!(matches!(err, InterviewError::QuestionBank(_)));
    }
}
