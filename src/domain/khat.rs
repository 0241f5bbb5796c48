use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{KhatId, NonEmptyString, QuestionId};

/// Follow-up question attached to a khat.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Question {
    /// Backend identifier.
    pub id: QuestionId,
    /// Letter the question was taken from.
    #[serde(default)]
    pub khat_id: Option<KhatId>,
    /// Question text.
    #[serde(default)]
    pub question: String,
    /// Reply, once one was saved.
    #[serde(default)]
    pub answer: Option<String>,
    /// Name of whoever asked.
    #[serde(default)]
    pub asked_by: Option<String>,
    /// When the question was recorded.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the answer was saved.
    #[serde(default)]
    pub answered_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionStatus {
    Pending,
    Answered,
}

impl Question {
    /// A question stays pending until it carries a non-blank answer.
    pub fn status(&self) -> QuestionStatus {
        match self.answer.as_deref().map(str::trim) {
            Some(answer) if !answer.is_empty() => QuestionStatus::Answered,
            _ => QuestionStatus::Pending,
        }
    }
}

/// Body of `POST /questions/add`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewQuestion {
    pub khat_id: KhatId,
    pub question: NonEmptyString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asked_by: Option<String>,
}

/// Body of the answer update.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AnswerQuestion {
    /// Reply text.
    pub answer: NonEmptyString,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn blank_answer_keeps_question_pending() {
        let mut question: Question =
            serde_json::from_value(json!({"id": 1, "question": "How?", "answer": "  "})).unwrap();
        assert_eq!(question.status(), QuestionStatus::Pending);

        question.answer = Some("Like this".to_string());
        assert_eq!(question.status(), QuestionStatus::Answered);
    }
}
