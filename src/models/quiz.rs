// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Upper bound for a single question's marks. Keeps every sum well inside `i64`.
pub const MAX_QUESTION_MARKS: i64 = 1_000_000;

/// A quiz whose marks do not fit in an `i64` when added up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Marks of quiz {quiz_id} overflow")]
pub struct MarksOverflow {
    pub quiz_id: i64,
}

/// One answer choice of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
}

/// A question of a quiz, including its answer key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within the owning quiz.
    pub id: i64,
    pub text: String,
    /// Points credited for a correct answer. Never negative.
    pub marks: i64,
    pub options: Vec<QuizOption>,
}

impl Question {
    /// The option marked as correct. If several are marked, the first one wins.
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|opt| opt.is_correct)
    }
}

/// A stored quiz definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    /// Owning course.
    pub course: i64,
    pub title: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    /// Sum of every question's marks, whether answered or not.
    pub fn total_marks(&self) -> Result<i64, MarksOverflow> {
        self.questions
            .iter()
            .try_fold(0i64, |sum, q| sum.checked_add(q.marks))
            .ok_or(MarksOverflow { quiz_id: self.id })
    }
}

/// Option as shown to quiz takers (no correctness flag).
#[derive(Debug, Serialize)]
pub struct PublicOption {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    pub marks: i64,
    pub options: Vec<PublicOption>,
}

/// DTO for sending a quiz to the client (excludes the answer key).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: i64,
    pub course: i64,
    pub title: String,
    pub total_marks: i64,
    pub questions: Vec<PublicQuestion>,
}

impl TryFrom<Quiz> for PublicQuiz {
    type Error = MarksOverflow;

    fn try_from(quiz: Quiz) -> Result<Self, Self::Error> {
        let total_marks = quiz.total_marks()?;
        Ok(Self {
            id: quiz.id,
            course: quiz.course,
            title: quiz.title,
            total_marks,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    text: q.text,
                    marks: q.marks,
                    options: q
                        .options
                        .into_iter()
                        .map(|opt| PublicOption { text: opt.text })
                        .collect(),
                })
                .collect(),
        })
    }
}

/// DTO for creating a new quiz.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    pub course: i64,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, message = "A quiz needs at least one question."), nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

/// DTO for a question inside `CreateQuizRequest`.
/// `Serialize` is needed by validator to report the value of a failed `length` check.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[validate(range(min = 0, max = 1_000_000, message = "Marks must be between 0 and 1000000."))]
    pub marks: i64,
    #[validate(custom(function = validate_options))]
    pub options: Vec<QuizOption>,
}

fn validate_options(options: &[QuizOption]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    for opt in options {
        if opt.text.is_empty() || opt.text.len() > 500 {
            return Err(validator::ValidationError::new("invalid_option_text"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, is_correct: bool) -> QuizOption {
        QuizOption {
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn test_correct_option_takes_first_flagged() {
        let question = Question {
            id: 1,
            text: "Pick".to_string(),
            marks: 1,
            options: vec![option("A", false), option("B", true), option("C", true)],
        };
        assert_eq!(question.correct_option().map(|o| o.text.as_str()), Some("B"));
    }

    #[test]
    fn test_public_quiz_hides_answer_key() {
        let quiz = Quiz {
            id: 7,
            course: 3,
            title: "Rust basics".to_string(),
            questions: vec![Question {
                id: 1,
                text: "Borrowing?".to_string(),
                marks: 4,
                options: vec![option("yes", true), option("no", false)],
            }],
            created_at: Utc::now(),
        };

        let public = serde_json::to_value(PublicQuiz::try_from(quiz).unwrap()).unwrap();
        assert_eq!(public["totalMarks"], 4);
        assert_eq!(public["questions"][0]["options"][0], serde_json::json!({"text": "yes"}));
        assert!(!public.to_string().contains("isCorrect"));
    }

    #[test]
    fn test_total_marks_overflow_is_an_error() {
        let question = |id| Question {
            id,
            text: "Big".to_string(),
            marks: i64::MAX,
            options: vec![option("A", true)],
        };
        let quiz = Quiz {
            id: 9,
            course: 1,
            title: "Overflow".to_string(),
            questions: vec![question(1), question(2)],
            created_at: Utc::now(),
        };

        assert_eq!(quiz.total_marks(), Err(MarksOverflow { quiz_id: 9 }));
        assert!(PublicQuiz::try_from(quiz).is_err());
    }

    #[test]
    fn test_create_quiz_validation() {
        let valid = CreateQuizRequest {
            course: 1,
            title: "Quiz".to_string(),
            questions: vec![CreateQuestionRequest {
                text: "Q".to_string(),
                marks: 2,
                options: vec![option("A", true)],
            }],
        };
        assert!(valid.validate().is_ok());

        let mut no_questions = valid.clone();
        no_questions.questions.clear();
        assert!(no_questions.validate().is_err());

        let mut negative_marks = valid.clone();
        negative_marks.questions[0].marks = -1;
        assert!(negative_marks.validate().is_err());

        let mut max_marks = valid.clone();
        max_marks.questions[0].marks = MAX_QUESTION_MARKS;
        assert!(max_marks.validate().is_ok());

        let mut huge_marks = valid.clone();
        huge_marks.questions[0].marks = MAX_QUESTION_MARKS + 1;
        assert!(huge_marks.validate().is_err());

        let mut no_options = valid;
        no_options.questions[0].options.clear();
        assert!(no_options.validate().is_err());
    }
}
