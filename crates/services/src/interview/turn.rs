use interview_core::model::{Question, SessionId, StatusSnapshot};
use serde::Serialize;

/// What the voice agent needs before its next utterance: the question it is
/// on and the pacing snapshot to steer by.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewTurn {
    pub session_id: SessionId,
    /// 1-based position of `question`, `None` once the bank is exhausted.
    pub question_number: Option<usize>,
    pub question: Option<Question>,
    pub status: StatusSnapshot,
}

impl InterviewTurn {
    /// True when pacing says to stop probing and move to the next question.
    #[must_use]
    pub fn should_move_on(&self) -> bool {
        self.status.urgency().is_pressing()
    }
}
