// src/handlers/submission.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError, models::submission::SubmitQuizRequest, services::SubmissionService,
};

/// Submits a user's answers for a quiz.
///
/// Returns 201 Created with the scored submission.
/// 400 on missing fields or a repeated submission, 404 if the quiz or user is unknown.
pub async fn submit_quiz(
    State(service): State<SubmissionService>,
    payload: Result<Json<SubmitQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let submission = service.submit(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Quiz submitted successfully",
            "submission": submission,
        })),
    ))
}

/// Retrieves one user's submission for a quiz, with quiz and user details.
pub async fn get_submission(
    State(service): State<SubmissionService>,
    Path((user_id, quiz_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let submission = service.get_submission(user_id, quiz_id).await?;
    Ok(Json(submission))
}

/// Lists all submissions of a quiz with user details.
/// Returns 404 while nobody has submitted yet.
pub async fn get_submissions_for_quiz(
    State(service): State<SubmissionService>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let submissions = service.get_submissions_for_quiz(quiz_id).await?;
    Ok(Json(submissions))
}
