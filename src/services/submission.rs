// src/services/submission.rs

use std::{collections::HashMap, sync::Arc};

use crate::{
    error::AppError,
    models::submission::{
        NewSubmission, Submission, SubmissionDetail, SubmissionWithUser, SubmitQuizRequest,
    },
    scoring,
    store::{QuizStore, StoreError, SubmissionStore, UserStore},
};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const ALREADY_SUBMITTED: &str = "Quiz already submitted";
pub const QUIZ_NOT_FOUND: &str = "Quiz not found";
pub const SUBMISSION_NOT_FOUND: &str = "Submission not found";
pub const NO_SUBMISSIONS_FOUND: &str = "No submissions found";

/// Scores and records quiz submissions.
///
/// Holds handles to the stores it needs; clone it freely.
#[derive(Clone)]
pub struct SubmissionService {
    quizzes: Arc<dyn QuizStore>,
    users: Arc<dyn UserStore>,
    submissions: Arc<dyn SubmissionStore>,
}

impl SubmissionService {
    pub fn new(
        quizzes: Arc<dyn QuizStore>,
        users: Arc<dyn UserStore>,
        submissions: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            quizzes,
            users,
            submissions,
        }
    }

    /// Scores a user's answers and stores the result.
    ///
    /// * Rejects requests missing the user, quiz or answers.
    /// * Rejects a second submission for the same user and quiz.
    /// * Copies the course from the quiz onto the submission.
    pub async fn submit(&self, req: SubmitQuizRequest) -> Result<Submission, AppError> {
        let (Some(user_id), Some(quiz_id), Some(answers)) = (req.user_id, req.quiz_id, req.answers)
        else {
            return Err(AppError::BadRequest(ALL_FIELDS_REQUIRED.to_string()));
        };

        if self
            .submissions
            .find_submission(user_id, quiz_id)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(ALREADY_SUBMITTED.to_string()));
        }

        let quiz = self
            .quizzes
            .find_quiz(quiz_id)
            .await?
            .ok_or(AppError::NotFound(QUIZ_NOT_FOUND.to_string()))?;

        let card = scoring::score(&quiz, &answers)?;

        // The existence check above is only a fast path; the store's insert decides.
        let submission = self
            .submissions
            .insert_submission(NewSubmission {
                user: user_id,
                quiz: quiz.id,
                course: quiz.course,
                answers: card.answers,
                score: card.score,
                total_marks: card.total_marks,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AppError::BadRequest(ALREADY_SUBMITTED.to_string()),
                other => AppError::from(other),
            })?;

        tracing::info!(
            "User {} submitted quiz {}: {}/{}",
            user_id,
            quiz_id,
            submission.score,
            submission.total_marks
        );

        Ok(submission)
    }

    /// Fetches a user's submission for a quiz, with quiz and user expanded.
    pub async fn get_submission(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<SubmissionDetail, AppError> {
        let submission = self
            .submissions
            .find_submission(user_id, quiz_id)
            .await?
            .ok_or(AppError::NotFound(SUBMISSION_NOT_FOUND.to_string()))?;

        let quiz = self.quizzes.find_quiz(submission.quiz).await?.ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Submission {} references missing quiz {}",
                submission.id, submission.quiz
            ))
        })?;
        let user = self.users.find_user(submission.user).await?.ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Submission {} references missing user {}",
                submission.id, submission.user
            ))
        })?;

        Ok(submission.with_quiz(quiz).with_user(user))
    }

    /// Lists every submission of a quiz with the user expanded.
    /// An empty result is reported as not found.
    pub async fn get_submissions_for_quiz(
        &self,
        quiz_id: i64,
    ) -> Result<Vec<SubmissionWithUser>, AppError> {
        let submissions = self.submissions.find_submissions_by_quiz(quiz_id).await?;
        if submissions.is_empty() {
            return Err(AppError::NotFound(NO_SUBMISSIONS_FOUND.to_string()));
        }

        let mut user_ids: Vec<i64> = submissions.iter().map(|s| s.user).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users: HashMap<i64, _> = self
            .users
            .find_users(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        submissions
            .into_iter()
            .map(|s| match users.get(&s.user) {
                Some(user) => Ok(s.with_user(user.clone())),
                None => Err(AppError::InternalServerError(format!(
                    "Submission {} references missing user {}",
                    s.id, s.user
                ))),
            })
            .collect()
    }
}
