use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank cannot be empty")]
    Empty,

    #[error("question {index} has no text")]
    BlankQuestion { index: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One entry of the interview question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Zero-based position in the bank.
    pub index: usize,
    /// Short label for logs, e.g. "background".
    pub topic: String,
    pub text: String,
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Fixed, ordered list of interview questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

const DEFAULT_QUESTIONS: [(&str, &str); 10] = [
    (
        "background",
        "To start, could you walk me through your background and what brought you to this role?",
    ),
    (
        "recent_project",
        "Tell me about a recent project you are proud of. What was your part in it?",
    ),
    (
        "technical_depth",
        "Pick a system you know well and explain how it works end to end.",
    ),
    (
        "problem_solving",
        "Describe a difficult bug or outage you investigated. How did you find the cause?",
    ),
    (
        "tradeoffs",
        "Tell me about a design decision where you had to trade one quality for another.",
    ),
    (
        "collaboration",
        "How do you handle disagreements with teammates about technical direction?",
    ),
    (
        "failure",
        "Describe something that did not go as planned. What did you change afterwards?",
    ),
    (
        "learning",
        "What is something you learned recently, and how did you go about learning it?",
    ),
    (
        "motivation",
        "What kind of work gives you the most energy, and what drains it?",
    ),
    (
        "candidate_questions",
        "Finally, what questions do you have for us about the team or the role?",
    ),
];

impl QuestionBank {
    /// Builds a bank from `(topic, text)` pairs, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Empty` for an empty list and
    /// `QuestionBankError::BlankQuestion` if any text is blank.
    pub fn new<I, T, Q>(entries: I) -> Result<Self, QuestionBankError>
    where
        I: IntoIterator<Item = (T, Q)>,
        T: Into<String>,
        Q: Into<String>,
    {
        let mut questions = Vec::new();
        for (index, (topic, text)) in entries.into_iter().enumerate() {
            let text: String = text.into();
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(QuestionBankError::BlankQuestion { index });
            }
            questions.push(Question {
                index,
                topic: topic.into(),
                text,
            });
        }

        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }

        Ok(Self { questions })
    }

    /// The standard ten-question bank.
    #[must_use]
    pub fn default_bank() -> Self {
        let questions = DEFAULT_QUESTIONS
            .iter()
            .enumerate()
            .map(|(index, (topic, text))| Question {
                index,
                topic: (*topic).to_string(),
                text: (*text).to_string(),
            })
            .collect();
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::default_bank()
    }
}
