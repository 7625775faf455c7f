// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, PublicQuiz},
    services::submission::QUIZ_NOT_FOUND,
    store::QuizStore,
};

/// Creates a quiz together with its questions and answer key.
/// Returns 201 Created and the stored quiz (including the key).
pub async fn create_quiz(
    State(quizzes): State<Arc<dyn QuizStore>>,
    payload: Result<Json<CreateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz = quizzes.insert_quiz(payload).await.map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!("Created quiz {} with {} questions", quiz.id, quiz.questions.len());

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Fetches a quiz for taking it. Option correctness is not included.
pub async fn get_quiz(
    State(quizzes): State<Arc<dyn QuizStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = quizzes
        .find_quiz(id)
        .await?
        .ok_or(AppError::NotFound(QUIZ_NOT_FOUND.to_string()))?;

    Ok(Json(PublicQuiz::try_from(quiz)?))
}
