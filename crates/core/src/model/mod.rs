mod config;
mod ids;
mod phase;
mod question;
mod status;

pub use ids::SessionId;

pub use config::{ConfigError, PacingConfig};
pub use phase::{Phase, Urgency};
pub use question::{Question, QuestionBank, QuestionBankError};
pub use status::StatusSnapshot;
