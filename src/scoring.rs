// src/scoring.rs

use std::collections::HashMap;

use crate::models::{
    quiz::{MarksOverflow, Question, Quiz},
    submission::{AnswerInput, SubmissionAnswer},
};

/// Outcome of scoring one set of answers against a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    /// Scored answers, in submission order. Answers to unknown questions are absent.
    pub answers: Vec<SubmissionAnswer>,
    pub score: i64,
    pub total_marks: i64,
}

/// Scores `answers` against the answer key of `quiz`.
///
/// * Answers referencing a question outside the quiz are dropped.
/// * An answer is correct when it matches the text of the question's correct option exactly.
/// * A question without a correct option can never be answered correctly.
/// * Repeated answers to the same question are each credited.
///
/// Fails only if the marks do not fit in an `i64`.
pub fn score(quiz: &Quiz, answers: &[AnswerInput]) -> Result<ScoreCard, MarksOverflow> {
    let total_marks = quiz.total_marks()?;
    let questions: HashMap<i64, &Question> = quiz.questions.iter().map(|q| (q.id, q)).collect();

    let mut score: i64 = 0;
    let mut scored = Vec::with_capacity(answers.len());

    for answer in answers {
        let Some(question) = questions.get(&answer.question) else {
            continue;
        };

        let is_correct = question
            .correct_option()
            .is_some_and(|opt| opt.text == answer.selected_option);

        if is_correct {
            score = score
                .checked_add(question.marks)
                .ok_or(MarksOverflow { quiz_id: quiz.id })?;
        }

        scored.push(SubmissionAnswer {
            question: question.id,
            selected_option: answer.selected_option.clone(),
            is_correct,
        });
    }

    Ok(ScoreCard {
        answers: scored,
        score,
        total_marks,
    })
}
