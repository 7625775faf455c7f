// src/store/mod.rs

//! Persistence seams.
//!
//! Handlers and services only see these traits. `PgStore` backs them with
//! PostgreSQL, `MemoryStore` keeps everything in process.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    quiz::{CreateQuizRequest, Quiz},
    submission::{NewSubmission, Submission},
    user::{CreateUserRequest, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    /// The write points at a row that does not exist.
    #[error("{0} not found")]
    MissingReference(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn insert_quiz(&self, quiz: CreateQuizRequest) -> Result<Quiz, StoreError>;

    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the username or email is taken.
    async fn insert_user(&self, user: CreateUserRequest) -> Result<User, StoreError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Users for the given IDs. Unknown IDs are skipped; order is unspecified.
    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn find_submission(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Option<Submission>, StoreError>;

    /// All submissions of a quiz, oldest first.
    async fn find_submissions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Submission>, StoreError>;

    /// Persists a submission.
    ///
    /// Must reject a second submission for the same (user, quiz) pair with
    /// `StoreError::Duplicate`, atomically with the insert.
    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, StoreError>;
}
