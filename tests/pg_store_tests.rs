// tests/pg_store_tests.rs
//
// Runs against a real Postgres when DATABASE_URL is set; every test returns early otherwise.

use std::sync::Arc;

use quiz_backend::{
    config::Config,
    models::{
        quiz::{CreateQuestionRequest, CreateQuizRequest, Quiz, QuizOption},
        submission::{NewSubmission, SubmissionAnswer},
        user::{CreateUserRequest, User},
    },
    routes,
    state::AppState,
    store::{PgStore, QuizStore, StoreError, SubmissionStore, UserStore},
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;

/// Connects and migrates, or returns `None` when no database is configured.
async fn connect() -> Option<Arc<PgStore>> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is valid.");

    let store = PgStore::new(pool);
    store.migrate().await.expect("Failed to migrate database");

    Some(Arc::new(store))
}

/// Spawns the app on a random port, backed by `store`.
async fn spawn_app(store: Arc<PgStore>) -> String {
    let app = routes::create_router(AppState::new(Config::default(), store));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn option(text: &str, is_correct: bool) -> QuizOption {
    QuizOption {
        text: text.to_string(),
        is_correct,
    }
}

fn question(text: &str, marks: i64, correct: &str) -> CreateQuestionRequest {
    CreateQuestionRequest {
        text: text.to_string(),
        marks,
        options: vec![option("wrong", false), option(correct, true)],
    }
}

async fn insert_user(store: &PgStore) -> User {
    let name = format!("pg_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    store
        .insert_user(CreateUserRequest {
            email: format!("{}@example.com", name),
            username: name,
        })
        .await
        .expect("Failed to insert user")
}

async fn insert_quiz(store: &PgStore) -> Quiz {
    store
        .insert_quiz(CreateQuizRequest {
            course: 77,
            title: "Postgres quiz".to_string(),
            questions: vec![
                question("First", 5, "A"),
                question("Second", 3, "B"),
                question("Third", 2, "C"),
            ],
        })
        .await
        .expect("Failed to insert quiz")
}

fn new_submission(user: i64, quiz: &Quiz) -> NewSubmission {
    NewSubmission {
        user,
        quiz: quiz.id,
        course: quiz.course,
        answers: vec![SubmissionAnswer {
            question: quiz.questions[0].id,
            selected_option: "A".to_string(),
            is_correct: true,
        }],
        score: 5,
        total_marks: 10,
    }
}

#[tokio::test]
async fn pg_quiz_round_trip_keeps_question_order() {
    let Some(store) = connect().await else { return };

    let inserted = insert_quiz(&store).await;
    let found = store
        .find_quiz(inserted.id)
        .await
        .unwrap()
        .expect("Quiz should exist");

    let texts: Vec<&str> = found.questions.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["First", "Second", "Third"]);
    assert_eq!(found.questions[1].options, vec![option("wrong", false), option("B", true)]);
    assert_eq!(found, inserted);
    assert_eq!(found.total_marks(), Ok(10));
}

#[tokio::test]
async fn pg_marks_above_limit_are_rejected_by_constraint() {
    let Some(store) = connect().await else { return };

    let result = store
        .insert_quiz(CreateQuizRequest {
            course: 1,
            title: "Too many marks".to_string(),
            questions: vec![question("Huge", 1_000_001, "A")],
        })
        .await;

    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[tokio::test]
async fn pg_duplicate_submission_maps_to_duplicate() {
    let Some(store) = connect().await else { return };
    let user = insert_user(&store).await;
    let quiz = insert_quiz(&store).await;

    let stored = store
        .insert_submission(new_submission(user.id, &quiz))
        .await
        .unwrap();
    assert_eq!(stored.answers, new_submission(user.id, &quiz).answers);

    // Straight to the insert, skipping the service's existence check.
    let err = store
        .insert_submission(new_submission(user.id, &quiz))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Duplicate("Submission")));

    let all = store.find_submissions_by_quiz(quiz.id).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn pg_unknown_user_maps_to_missing_reference() {
    let Some(store) = connect().await else { return };
    let quiz = insert_quiz(&store).await;

    let err = store
        .insert_submission(new_submission(i64::MAX, &quiz))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingReference("User")));
}

#[tokio::test]
async fn pg_find_users_skips_unknown_ids() {
    let Some(store) = connect().await else { return };
    let a = insert_user(&store).await;
    let b = insert_user(&store).await;

    let mut found = store.find_users(&[b.id, i64::MAX, a.id]).await.unwrap();
    found.sort_by_key(|u| u.id);

    let mut expected = vec![a, b];
    expected.sort_by_key(|u| u.id);
    assert_eq!(found, expected);
}

#[tokio::test]
async fn pg_submission_flow_over_http() {
    let Some(store) = connect().await else { return };
    let user = insert_user(&store).await;
    let quiz = insert_quiz(&store).await;
    let address = spawn_app(store).await;
    let client = reqwest::Client::new();

    let body = json!({
        "userId": user.id,
        "quizId": quiz.id,
        "answers": [
            {"question": quiz.questions[0].id, "selectedOption": "A"},
            {"question": quiz.questions[1].id, "selectedOption": "wrong"}
        ]
    });

    // 1. First submit is scored and stored
    let response = client
        .post(format!("{}/api/submissions", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["submission"]["score"], 5);
    assert_eq!(created["submission"]["totalMarks"], 10);
    assert_eq!(created["submission"]["course"], 77);

    // 2. Second submit is rejected
    let response = client
        .post(format!("{}/api/submissions", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Quiz already submitted");

    // 3. Unknown user is a 404 from the foreign key
    let response = client
        .post(format!("{}/api/submissions", address))
        .json(&json!({ "userId": i64::MAX, "quizId": quiz.id, "answers": [] }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "User not found");

    // 4. Detail view round-trips the JSONB answers
    let response = client
        .get(format!("{}/api/submissions/{}/{}", address, user.id, quiz.id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let detail: Value = response.json().await.unwrap();
    assert_eq!(detail["user"]["username"], user.username.as_str());
    assert_eq!(
        detail["answers"],
        json!([
            {"question": quiz.questions[0].id, "selectedOption": "A", "isCorrect": true},
            {"question": quiz.questions[1].id, "selectedOption": "wrong", "isCorrect": false}
        ])
    );

    // 5. Listing expands the user
    let response = client
        .get(format!("{}/api/quizzes/{}/submissions", address, quiz.id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let listed: Vec<Value> = response.json().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["user"]["id"], user.id);
}
