//! Session summaries and the submission wire format.

use serde::{Deserialize, Serialize};

use crate::error::SubmissionError;
use crate::model::{CategoryId, CategoryRef, QuestionId};

/// Name reported when the player did not enter one.
pub const ANONYMOUS: &str = "Anonymous";

/// One answered question as reported to the scoring endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub selected_answer: String,
}

/// Everything a reporter needs to submit one play-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(default)]
    pub user_name: Option<String>,
    pub category: CategoryRef,
    pub answers: Vec<AnswerEntry>,
}

/// Request body of `POST /quiz/submit/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPayload {
    pub user_name: String,
    pub category: CategoryId,
    pub answers: Vec<AnswerEntry>,
}

impl SessionSummary {
    /// Build the wire payload.
    ///
    /// Fails with [`SubmissionError::MissingCategory`] when the category id is
    /// unknown, so a malformed request is never sent.
    pub fn to_payload(&self) -> Result<SubmitPayload, SubmissionError> {
        let category = self.category.id.ok_or(SubmissionError::MissingCategory)?;
        let user_name = self
            .user_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();

        Ok(SubmitPayload {
            user_name,
            category,
            answers: self.answers.clone(),
        })
    }
}

/// Response of the scoring endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerAck {
    #[serde(default)]
    pub quiz_id: Option<u64>,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
}
