#![forbid(unsafe_code)]

pub mod error;
pub mod interview;
pub mod pacing_tracker;

pub use interview_core::Clock;

pub use error::InterviewError;
pub use interview::{InterviewProgress, InterviewSession, InterviewTurn};
pub use pacing_tracker::PacingTracker;
