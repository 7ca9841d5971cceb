//! The quiz session state machine.
//!
//! A session tracks which question is shown, the answer chosen for each
//! question, and whether the attempt is being reviewed or has been submitted.
//! It holds no questions of its own; callers pass the [`QuestionSet`] the
//! session was created for. Persistence side effects belong to the caller.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{ProgressSnapshot, QuestionSet, NUM_OPTIONS};
use crate::scoring::{self, ScoreResult};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Answering questions one at a time.
    InProgress,
    /// Looking over every question before submitting.
    Reviewing,
    /// Answers are locked in; questions can still be browsed.
    Submitted,
}

/// A request the session cannot honor in its current state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("question {index} does not exist (quiz has {count} questions)")]
    QuestionOutOfRange { index: usize, count: usize },
    #[error("option {choice} does not exist")]
    OptionOutOfRange { choice: usize },
    #[error("quiz has already been submitted")]
    AlreadySubmitted,
    #[error("leave review before changing answers")]
    Reviewing,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    current_index: usize,
    answers: Vec<Option<usize>>,
    phase: Phase,
    score: Option<ScoreResult>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// A fresh attempt positioned on the first question with nothing answered.
    pub fn new(questions: &QuestionSet) -> Self {
        Self {
            current_index: 0,
            answers: vec![None; questions.len()],
            phase: Phase::InProgress,
            score: None,
            started_at: Utc::now(),
        }
    }

    /// Restores an attempt from a saved snapshot.
    ///
    /// Returns `None` when the snapshot was taken against a question set of a
    /// different size or is otherwise inconsistent.
    pub fn resume(questions: &QuestionSet, snapshot: &ProgressSnapshot) -> Option<Self> {
        if !snapshot.fits(questions.len()) {
            return None;
        }

        Some(Self {
            current_index: snapshot.current_question_index,
            answers: snapshot.user_answers.clone(),
            phase: Phase::InProgress,
            score: None,
            started_at: snapshot.start_time,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<usize> {
        self.answers.get(index).copied().flatten()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    pub fn is_reviewing(&self) -> bool {
        self.phase == Phase::Reviewing
    }

    pub fn is_on_last(&self) -> bool {
        self.current_index + 1 == self.question_count()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The result computed at submission, if submitted.
    pub fn score(&self) -> Option<ScoreResult> {
        self.score
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.question_count() - self.answered_count()
    }

    /// Records `choice` for question `index`, replacing any earlier choice.
    pub fn select_answer(&mut self, index: usize, choice: usize) -> Result<(), SessionError> {
        match self.phase {
            Phase::Submitted => return Err(SessionError::AlreadySubmitted),
            Phase::Reviewing => return Err(SessionError::Reviewing),
            Phase::InProgress => {}
        }

        if index >= self.question_count() {
            return Err(SessionError::QuestionOutOfRange {
                index,
                count: self.question_count(),
            });
        }
        if choice >= NUM_OPTIONS {
            return Err(SessionError::OptionOutOfRange { choice });
        }

        self.answers[index] = Some(choice);
        Ok(())
    }

    /// Moves forward one question. From the last unsubmitted question this
    /// opens review; on the last submitted question it does nothing.
    pub fn go_next(&mut self) {
        match self.phase {
            Phase::Reviewing => {}
            Phase::InProgress if self.is_on_last() => self.phase = Phase::Reviewing,
            Phase::InProgress | Phase::Submitted => {
                if !self.is_on_last() {
                    self.current_index += 1;
                }
            }
        }
    }

    pub fn go_previous(&mut self) {
        if self.phase != Phase::Reviewing && self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    /// Shows question `index` for editing, leaving review if it was open.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        if index >= self.question_count() {
            return Err(SessionError::QuestionOutOfRange {
                index,
                count: self.question_count(),
            });
        }

        self.current_index = index;
        self.phase = Phase::InProgress;
        Ok(())
    }

    /// Locks in the answers and scores them. Unanswered questions are allowed.
    pub fn submit(&mut self, questions: &QuestionSet) -> Result<ScoreResult, SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }

        let result = scoring::score(questions, &self.answers);
        self.phase = Phase::Submitted;
        self.score = Some(result);
        Ok(result)
    }

    /// Discards every answer and starts over on the first question.
    pub fn restart(&mut self) {
        self.current_index = 0;
        self.answers.iter_mut().for_each(|answer| *answer = None);
        self.phase = Phase::InProgress;
        self.score = None;
        self.started_at = Utc::now();
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            current_question_index: self.current_index,
            user_answers: self.answers.clone(),
            start_time: self.started_at,
            questions_total: self.question_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;

    fn question_set(correct: &[usize]) -> QuestionSet {
        QuestionSet::new(
            correct
                .iter()
                .enumerate()
                .map(|(i, c)| Question::new(format!("question {i}"), ["a", "b", "c", "d"], *c))
                .collect(),
        )
        .unwrap()
    }

    fn assert_fresh(session: &QuizSession, count: usize) {
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answers(), vec![None; count].as_slice());
        assert_eq!(session.phase(), Phase::InProgress);
        assert!(!session.is_submitted());
        assert_eq!(session.score(), None);
    }

    #[test]
    fn test_new_session_is_fresh() {
        for count in 1..=5 {
            let set = question_set(&vec![0; count]);
            assert_fresh(&QuizSession::new(&set), count);
        }
    }

    #[test]
    fn test_select_answer_last_write_wins() {
        let set = question_set(&[0, 1]);
        let mut session = QuizSession::new(&set);

        session.select_answer(1, 2).unwrap();
        session.select_answer(1, 2).unwrap();
        assert_eq!(session.answer(1), Some(2));

        session.select_answer(1, 3).unwrap();
        assert_eq!(session.answers(), &[None, Some(3)]);
    }

    #[test]
    fn test_select_answer_out_of_range() {
        let set = question_set(&[0, 1]);
        let mut session = QuizSession::new(&set);

        assert_eq!(
            session.select_answer(2, 0),
            Err(SessionError::QuestionOutOfRange { index: 2, count: 2 })
        );
        assert_eq!(
            session.select_answer(0, 4),
            Err(SessionError::OptionOutOfRange { choice: 4 })
        );
        assert_eq!(session.answers(), &[None, None]);
    }

    #[test]
    fn test_navigation_in_progress() {
        let set = question_set(&[0, 0, 0]);
        let mut session = QuizSession::new(&set);

        session.go_previous();
        assert_eq!(session.current_index(), 0);

        session.go_next();
        session.go_next();
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.phase(), Phase::InProgress);

        session.go_previous();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_next_on_last_opens_review() {
        let set = question_set(&[0, 0]);
        let mut session = QuizSession::new(&set);

        session.go_next();
        session.go_next();
        assert!(session.is_reviewing());

        session.go_previous();
        session.go_next();
        assert!(session.is_reviewing());
        assert_eq!(
            session.select_answer(0, 1),
            Err(SessionError::Reviewing)
        );
    }

    #[test]
    fn test_jump_from_review_edits_question() {
        let set = question_set(&[0, 0, 0]);
        let mut session = QuizSession::new(&set);
        session.jump_to(2).unwrap();
        session.go_next();
        assert!(session.is_reviewing());

        session.jump_to(0).unwrap();
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.current_index(), 0);
        session.select_answer(0, 3).unwrap();
        assert_eq!(session.answer(0), Some(3));
    }

    #[test]
    fn test_submit_with_no_answers() {
        let set = question_set(&[0, 1, 2]);
        let mut session = QuizSession::new(&set);

        let result = session.submit(&set).unwrap();
        assert_eq!(result, ScoreResult { correct: 0, total: 3 });
        assert!(session.is_submitted());
        assert_eq!(session.score(), Some(result));
    }

    #[test]
    fn test_submit_all_correct() {
        let set = question_set(&[2, 0, 3]);
        let mut session = QuizSession::new(&set);
        session.select_answer(0, 2).unwrap();
        session.select_answer(1, 0).unwrap();
        session.select_answer(2, 3).unwrap();

        let result = session.submit(&set).unwrap();
        assert_eq!(result, ScoreResult { correct: 3, total: 3 });
        assert_eq!(result.percentage(), 100);
    }

    #[test]
    fn test_submit_from_review() {
        let set = question_set(&[0, 1]);
        let mut session = QuizSession::new(&set);
        session.select_answer(0, 0).unwrap();
        session.go_next();
        session.select_answer(1, 0).unwrap();
        session.go_next();
        assert!(session.is_reviewing());

        let result = session.submit(&set).unwrap();
        assert_eq!(result, ScoreResult { correct: 1, total: 2 });
        assert!(!session.is_reviewing());
        assert!(session.is_submitted());
    }

    #[test]
    fn test_answers_locked_after_submit() {
        let set = question_set(&[0, 1]);
        let mut session = QuizSession::new(&set);
        session.select_answer(0, 1).unwrap();
        session.submit(&set).unwrap();

        assert_eq!(
            session.select_answer(0, 0),
            Err(SessionError::AlreadySubmitted)
        );
        assert_eq!(session.jump_to(1), Err(SessionError::AlreadySubmitted));
        assert_eq!(session.submit(&set), Err(SessionError::AlreadySubmitted));
        assert_eq!(session.answers(), &[Some(1), None]);
    }

    #[test]
    fn test_navigation_after_submit() {
        let set = question_set(&[0, 0, 0]);
        let mut session = QuizSession::new(&set);
        session.submit(&set).unwrap();

        session.go_next();
        session.go_next();
        assert_eq!(session.current_index(), 2);

        session.go_next();
        assert_eq!(session.current_index(), 2);
        assert!(session.is_submitted());

        session.go_previous();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_restart_matches_fresh_session() {
        let set = question_set(&[0, 1, 2]);

        let mut submitted = QuizSession::new(&set);
        submitted.select_answer(0, 0).unwrap();
        submitted.go_next();
        submitted.submit(&set).unwrap();
        submitted.restart();
        assert_fresh(&submitted, 3);

        let mut reviewing = QuizSession::new(&set);
        reviewing.jump_to(2).unwrap();
        reviewing.go_next();
        reviewing.restart();
        assert_fresh(&reviewing, 3);
    }

    #[test]
    fn test_resume_reproduces_snapshot() {
        let set = question_set(&[0, 1, 2]);
        let mut session = QuizSession::new(&set);
        session.select_answer(0, 3).unwrap();
        session.go_next();
        session.go_next();
        session.select_answer(2, 1).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.questions_total, 3);

        let resumed = QuizSession::resume(&set, &snapshot).unwrap();
        assert_eq!(resumed.current_index(), 2);
        assert_eq!(resumed.answers(), &[Some(3), None, Some(1)]);
        assert_eq!(resumed.started_at(), session.started_at());
        assert_eq!(resumed.phase(), Phase::InProgress);
    }

    #[test]
    fn test_resume_rejects_mismatched_count() {
        let small = question_set(&[0, 1]);
        let large = question_set(&[0, 1, 2]);
        let snapshot = QuizSession::new(&small).snapshot();

        assert!(QuizSession::resume(&large, &snapshot).is_none());
    }

    #[test]
    fn test_unanswered_count() {
        let set = question_set(&[0, 1, 2, 3]);
        let mut session = QuizSession::new(&set);
        session.select_answer(1, 1).unwrap();
        session.select_answer(3, 0).unwrap();

        assert_eq!(session.answered_count(), 2);
        assert_eq!(session.unanswered_count(), 2);
    }

    #[test]
    fn test_documented_example() {
        let set = question_set(&[0, 1]);
        let mut session = QuizSession::new(&set);
        session.select_answer(0, 0).unwrap();
        session.go_next();
        session.select_answer(1, 1).unwrap();
        session.select_answer(1, 0).unwrap();

        let result = session.submit(&set).unwrap();
        assert_eq!(session.answers(), &[Some(0), Some(0)]);
        assert_eq!(result, ScoreResult { correct: 1, total: 2 });
    }
}
