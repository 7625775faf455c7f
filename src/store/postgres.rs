// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use super::{QuizStore, StoreError, SubmissionStore, UserStore};
use crate::models::{
    quiz::{CreateQuizRequest, Question, Quiz, QuizOption},
    submission::{NewSubmission, Submission, SubmissionAnswer},
    user::{CreateUserRequest, User},
};

/// PostgreSQL-backed store. Cheap to clone (wraps the pool).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Helper struct for the 'quizzes' table.
#[derive(FromRow)]
struct QuizRow {
    id: i64,
    course_id: i64,
    title: String,
    created_at: DateTime<Utc>,
}

/// Helper struct for the 'questions' table. Options are a JSONB array.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    text: String,
    marks: i64,
    options: Json<Vec<QuizOption>>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            marks: row.marks,
            options: row.options.0,
        }
    }
}

/// Helper struct for the 'submissions' table. Answers are a JSONB array.
#[derive(FromRow)]
struct SubmissionRow {
    id: i64,
    user_id: i64,
    quiz_id: i64,
    course_id: i64,
    answers: Json<Vec<SubmissionAnswer>>,
    score: i64,
    total_marks: i64,
    created_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            user: row.user_id,
            quiz: row.quiz_id,
            course: row.course_id,
            answers: row.answers.0,
            score: row.score,
            total_marks: row.total_marks,
            created_at: row.created_at,
        }
    }
}

const SUBMISSION_COLUMNS: &str =
    "id, user_id, quiz_id, course_id, answers, score, total_marks, created_at";

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Translates constraint violations into `StoreError` variants.
/// `entity` names what was being written, for unique violations.
fn map_write_error(err: sqlx::Error, entity: &'static str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate(entity);
        }
        if db_err.is_foreign_key_violation() {
            let missing = match db_err.constraint() {
                Some(name) if name.contains("user") => "User",
                Some(name) if name.contains("quiz") => "Quiz",
                _ => "Referenced row",
            };
            return StoreError::MissingReference(missing);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl QuizStore for PgStore {
    async fn insert_quiz(&self, quiz: CreateQuizRequest) -> Result<Quiz, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, QuizRow>(
            r#"
            INSERT INTO quizzes (course_id, title)
            VALUES ($1, $2)
            RETURNING id, course_id, title, created_at
            "#,
        )
        .bind(quiz.course)
        .bind(&quiz.title)
        .fetch_one(&mut *tx)
        .await?;

        let mut questions = Vec::with_capacity(quiz.questions.len());
        for (position, question) in quiz.questions.into_iter().enumerate() {
            let inserted = sqlx::query_as::<_, QuestionRow>(
                r#"
                INSERT INTO questions (quiz_id, position, text, marks, options)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, text, marks, options
                "#,
            )
            .bind(row.id)
            .bind(position as i32)
            .bind(question.text)
            .bind(question.marks)
            .bind(Json(question.options))
            .fetch_one(&mut *tx)
            .await?;

            questions.push(Question::from(inserted));
        }

        tx.commit().await?;

        Ok(Quiz {
            id: row.id,
            course: row.course_id,
            title: row.title,
            questions,
            created_at: row.created_at,
        })
    }

    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, StoreError> {
        let row = sqlx::query_as::<_, QuizRow>(
            "SELECT id, course_id, title, created_at FROM quizzes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let questions = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, text, marks, options
            FROM questions
            WHERE quiz_id = $1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Quiz {
            id: row.id,
            course: row.course_id,
            title: row.title,
            questions: questions.into_iter().map(Question::from).collect(),
            created_at: row.created_at,
        }))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: CreateUserRequest) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User"))
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn find_submission(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Option<Submission>, StoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {} FROM submissions WHERE user_id = $1 AND quiz_id = $2",
            SUBMISSION_COLUMNS
        ))
        .bind(user_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Submission::from))
    }

    async fn find_submissions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Submission>, StoreError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {} FROM submissions WHERE quiz_id = $1 ORDER BY created_at, id",
            SUBMISSION_COLUMNS
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Submission::from).collect())
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        // UNIQUE (user_id, quiz_id) makes a concurrent second insert fail here.
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            INSERT INTO submissions (user_id, quiz_id, course_id, answers, score, total_marks)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SUBMISSION_COLUMNS
        ))
        .bind(submission.user)
        .bind(submission.quiz)
        .bind(submission.course)
        .bind(Json(submission.answers))
        .bind(submission.score)
        .bind(submission.total_marks)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Submission"))?;

        Ok(Submission::from(row))
    }
}
