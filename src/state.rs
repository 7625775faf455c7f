// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    services::SubmissionService,
    store::{QuizStore, SubmissionStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub quizzes: Arc<dyn QuizStore>,
    pub users: Arc<dyn UserStore>,
    pub submissions: SubmissionService,
}

impl AppState {
    /// Builds the state from one store backing every trait.
    pub fn new<S>(config: Config, store: Arc<S>) -> Self
    where
        S: QuizStore + UserStore + SubmissionStore + 'static,
    {
        let quizzes: Arc<dyn QuizStore> = store.clone();
        let users: Arc<dyn UserStore> = store.clone();
        let submission_store: Arc<dyn SubmissionStore> = store;

        Self {
            config,
            submissions: SubmissionService::new(quizzes.clone(), users.clone(), submission_store),
            quizzes,
            users,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuizStore> {
    fn from_ref(state: &AppState) -> Self {
        state.quizzes.clone()
    }
}

impl FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for SubmissionService {
    fn from_ref(state: &AppState) -> Self {
        state.submissions.clone()
    }
}
