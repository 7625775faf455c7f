// src/store/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{QuizStore, StoreError, SubmissionStore, UserStore};
use crate::models::{
    quiz::{CreateQuizRequest, Question, Quiz},
    submission::{NewSubmission, Submission},
    user::{CreateUserRequest, User},
};

/// In-process store used when no database is configured, and in tests.
///
/// Every write happens under one lock, so the (user, quiz) uniqueness check
/// and the insert are atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    users: BTreeMap<i64, User>,
    quizzes: BTreeMap<i64, Quiz>,
    submissions: Vec<Submission>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn insert_quiz(&self, quiz: CreateQuizRequest) -> Result<Quiz, StoreError> {
        let mut inner = self.inner.lock().await;

        let id = inner.next_id();
        let questions = quiz
            .questions
            .into_iter()
            .map(|q| Question {
                id: inner.next_id(),
                text: q.text,
                marks: q.marks,
                options: q.options,
            })
            .collect();

        let quiz = Quiz {
            id,
            course: quiz.course,
            title: quiz.title,
            questions,
            created_at: Utc::now(),
        };
        inner.quizzes.insert(id, quiz.clone());

        Ok(quiz)
    }

    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, StoreError> {
        Ok(self.inner.lock().await.quizzes.get(&id).cloned())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: CreateUserRequest) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;

        let taken = inner
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(StoreError::Duplicate("User"));
        }

        let user = User {
            id: inner.next_id(),
            username: user.username,
            email: user.email,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn find_submission(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Option<Submission>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .submissions
            .iter()
            .find(|s| s.user == user_id && s.quiz == quiz_id)
            .cloned())
    }

    async fn find_submissions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Submission>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .submissions
            .iter()
            .filter(|s| s.quiz == quiz_id)
            .cloned()
            .collect())
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        let mut inner = self.inner.lock().await;

        // Same checks the foreign keys and unique constraint perform in Postgres.
        if !inner.users.contains_key(&submission.user) {
            return Err(StoreError::MissingReference("User"));
        }
        if !inner.quizzes.contains_key(&submission.quiz) {
            return Err(StoreError::MissingReference("Quiz"));
        }
        let exists = inner
            .submissions
            .iter()
            .any(|s| s.user == submission.user && s.quiz == submission.quiz);
        if exists {
            return Err(StoreError::Duplicate("Submission"));
        }

        let stored = Submission {
            id: inner.next_id(),
            user: submission.user,
            quiz: submission.quiz,
            course: submission.course,
            answers: submission.answers,
            score: submission.score,
            total_marks: submission.total_marks,
            created_at: Utc::now(),
        };
        inner.submissions.push(stored.clone());

        Ok(stored)
    }
}
