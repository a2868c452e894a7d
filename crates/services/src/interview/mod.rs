mod progress;
mod service;
mod turn;

// Public API of the interview subsystem.
pub use crate::error::InterviewError;
pub use progress::InterviewProgress;
pub use service::InterviewSession;
pub use turn::InterviewTurn;
