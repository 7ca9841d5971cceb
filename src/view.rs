//! Pure projections of session state into what a screen needs to show.
//!
//! Nothing in here knows about terminals; the renderer in `ui` only reads
//! these structs.

use crate::models::{Question, QuestionSet};
use crate::scoring::{self, Outcome, ScoreResult};
use crate::session::QuizSession;

pub const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// What the forward navigation action does from the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    Next,
    ReviewAll,
    Disabled,
}

/// Styling hint for an option once answers are locked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    None,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView<'a> {
    pub label: char,
    pub text: &'a str,
    pub selected: bool,
    pub mark: OptionMark,
}

/// Feedback shown under a question after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback<'a> {
    Correct,
    Incorrect { correct_option: &'a str },
    NotAnswered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub number: usize,
    pub total: usize,
    pub text: &'a str,
    pub options: Vec<OptionView<'a>>,
    pub feedback: Option<Feedback<'a>>,
    pub can_go_previous: bool,
    pub next: NextAction,
    pub locked: bool,
}

pub fn question_view<'a>(questions: &'a QuestionSet, session: &QuizSession) -> QuestionView<'a> {
    let index = session.current_index();
    let question = &questions[index];
    let answer = session.answer(index);
    let locked = session.is_submitted();

    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(choice, text)| {
            let selected = answer == Some(choice);
            let mark = if !locked {
                OptionMark::None
            } else if question.is_correct(choice) {
                OptionMark::Correct
            } else if selected {
                OptionMark::Incorrect
            } else {
                OptionMark::None
            };

            OptionView {
                label: OPTION_LABELS[choice],
                text,
                selected,
                mark,
            }
        })
        .collect();

    let feedback = locked.then(|| feedback_for(question, answer));

    let next = match (locked, session.is_on_last()) {
        (false, true) => NextAction::ReviewAll,
        (true, true) => NextAction::Disabled,
        _ => NextAction::Next,
    };

    QuestionView {
        number: index + 1,
        total: questions.len(),
        text: &question.text,
        options,
        feedback,
        can_go_previous: index > 0,
        next,
        locked,
    }
}

fn feedback_for(question: &Question, answer: Option<usize>) -> Feedback<'_> {
    match answer {
        None => Feedback::NotAnswered,
        Some(choice) if question.is_correct(choice) => Feedback::Correct,
        Some(_) => Feedback::Incorrect {
            correct_option: question.correct_option(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem<'a> {
    pub number: usize,
    pub text: &'a str,
    pub answer: Option<&'a str>,
}

impl ReviewItem<'_> {
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView<'a> {
    pub items: Vec<ReviewItem<'a>>,
    pub unanswered: usize,
}

impl ReviewView<'_> {
    /// Non-blocking warning shown above the submit action.
    pub fn warning(&self) -> Option<String> {
        (self.unanswered > 0).then(|| {
            format!(
                "Warning: you have {} unanswered question(s). Select them above to answer.",
                self.unanswered
            )
        })
    }

    pub fn submit_label(&self) -> &'static str {
        if self.unanswered > 0 {
            "Submit Anyway"
        } else {
            "Submit Final Answers"
        }
    }
}

pub fn review_view<'a>(questions: &'a QuestionSet, session: &QuizSession) -> ReviewView<'a> {
    let items = questions
        .iter()
        .enumerate()
        .map(|(index, question)| ReviewItem {
            number: index + 1,
            text: &question.text,
            answer: session
                .answer(index)
                .and_then(|choice| question.option(choice)),
        })
        .collect();

    ReviewView {
        items,
        unanswered: session.unanswered_count(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem<'a> {
    pub number: usize,
    pub text: &'a str,
    pub your_answer: Option<&'a str>,
    pub correct_answer: &'a str,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView<'a> {
    pub score: ScoreResult,
    pub percentage: u32,
    pub message: &'static str,
    pub items: Vec<ResultItem<'a>>,
}

/// The results screen, or `None` before submission.
pub fn results_view<'a>(questions: &'a QuestionSet, session: &QuizSession) -> Option<ResultsView<'a>> {
    let score = session.score()?;
    let outcomes = scoring::grade(questions, session.answers());

    let items = questions
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, (question, outcome))| ResultItem {
            number: index + 1,
            text: &question.text,
            your_answer: session
                .answer(index)
                .and_then(|choice| question.option(choice)),
            correct_answer: question.correct_option(),
            outcome,
        })
        .collect();

    Some(ResultsView {
        score,
        percentage: score.percentage(),
        message: result_message(score),
        items,
    })
}

/// Encouragement line for a final score.
pub fn result_message(score: ScoreResult) -> &'static str {
    let percentage = if score.total == 0 {
        0.0
    } else {
        score.correct as f64 / score.total as f64 * 100.0
    };

    if score.is_perfect() {
        "Perfect score! You're a web development master!"
    } else if percentage >= 80.0 {
        "Excellent work! You know your web development!"
    } else if percentage >= 60.0 {
        "Good job! Keep learning web development!"
    } else if percentage >= 40.0 {
        "Not bad! Practice more web development concepts."
    } else {
        "Keep practicing! Web development takes time to master!"
    }
}
