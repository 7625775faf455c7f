// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answer as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    /// Question ID within the quiz.
    pub question: i64,
    /// Text of the chosen option.
    pub selected_option: String,
}

/// DTO for submitting a quiz attempt.
/// Every field is optional on the wire so a missing one maps to a 400 instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub user_id: Option<i64>,
    pub quiz_id: Option<i64>,
    pub answers: Option<Vec<AnswerInput>>,
}

/// A scored answer as persisted in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAnswer {
    pub question: i64,
    pub selected_option: String,
    pub is_correct: bool,
}

/// A user's scored attempt at a quiz.
///
/// `U` and `Q` are the user and quiz references. Stores hand out plain IDs;
/// the service swaps in full records for the expanded views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission<U = i64, Q = i64> {
    pub id: i64,
    pub user: U,
    pub quiz: Q,
    /// Copied from the quiz when the submission is created.
    pub course: i64,
    pub answers: Vec<SubmissionAnswer>,
    pub score: i64,
    pub total_marks: i64,
    pub created_at: DateTime<Utc>,
}

impl<U, Q> Submission<U, Q> {
    pub fn with_user<V>(self, user: V) -> Submission<V, Q> {
        Submission {
            id: self.id,
            user,
            quiz: self.quiz,
            course: self.course,
            answers: self.answers,
            score: self.score,
            total_marks: self.total_marks,
            created_at: self.created_at,
        }
    }

    pub fn with_quiz<R>(self, quiz: R) -> Submission<U, R> {
        Submission {
            id: self.id,
            user: self.user,
            quiz,
            course: self.course,
            answers: self.answers,
            score: self.score,
            total_marks: self.total_marks,
            created_at: self.created_at,
        }
    }
}

/// Submission with both quiz and user expanded.
pub type SubmissionDetail = Submission<crate::models::user::User, crate::models::quiz::Quiz>;

/// Submission with the user expanded, as listed per quiz.
pub type SubmissionWithUser = Submission<crate::models::user::User, i64>;

/// Insert payload for the submission store.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user: i64,
    pub quiz: i64,
    pub course: i64,
    pub answers: Vec<SubmissionAnswer>,
    pub score: i64,
    pub total_marks: i64,
}
