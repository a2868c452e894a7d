//! Shared error types for the services crate.

use thiserror::Error;

use interview_core::model::QuestionBankError;

/// Errors emitted by `InterviewSession`.
///
/// Pacing itself never fails; these cover the question walk only.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InterviewError {
    #[error("all interview questions have been asked")]
    Completed,
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
}
