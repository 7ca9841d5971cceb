//! Scoring of a finished attempt.

use crate::models::Question;

/// Number of correct answers out of the question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub correct: usize,
    pub total: usize,
}

impl ScoreResult {
    /// Percentage rounded to the nearest whole number.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.correct as f64 / self.total as f64 * 100.0).round() as u32
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

/// How a single question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect(usize),
    Unanswered,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

/// Counts the answers that match their question's correct option.
///
/// Unset answers never count, and answers past the end of `questions` are ignored.
pub fn score(questions: &[Question], answers: &[Option<usize>]) -> ScoreResult {
    let correct = answers
        .iter()
        .zip(questions.iter())
        .filter(|(answer, question)| **answer == Some(question.correct_index))
        .count();

    ScoreResult {
        correct,
        total: questions.len(),
    }
}

/// Per-question outcomes, aligned with `questions`.
pub fn grade(questions: &[Question], answers: &[Option<usize>]) -> Vec<Outcome> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| match answers.get(index).copied().flatten() {
            None => Outcome::Unanswered,
            Some(choice) if question.is_correct(choice) => Outcome::Correct,
            Some(choice) => Outcome::Incorrect(choice),
        })
        .collect()
}
