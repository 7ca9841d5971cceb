use std::ops::Deref;

use thiserror::Error;

use crate::models::{Question, NUM_OPTIONS};

/// Reasons a list of questions cannot be used for a quiz.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionSetError {
    #[error("question set must contain at least one question")]
    Empty,
    #[error("question {index} marks option {correct} as correct, which is out of range")]
    CorrectOutOfRange { index: usize, correct: usize },
}

/// Non-empty, ordered list of questions whose correct indices are in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }

        if let Some((index, question)) = questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.correct_index >= NUM_OPTIONS)
        {
            return Err(QuestionSetError::CorrectOutOfRange {
                index,
                correct: question.correct_index,
            });
        }

        Ok(Self { questions })
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }
}

impl Deref for QuestionSet {
    type Target = [Question];

    fn deref(&self) -> &Self::Target {
        &self.questions
    }
}
