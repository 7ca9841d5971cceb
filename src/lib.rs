//! # webdev-quiz
//!
//! A terminal multiple-choice quiz with review before submission, resumable
//! progress, and locally stored history, statistics and preferences.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use webdev_quiz::data::embedded_questions;
//! use webdev_quiz::store::JsonFileStore;
//! use webdev_quiz::{App, Quiz, QuizError};
//!
//! fn main() -> Result<(), QuizError> {
//!     let questions = embedded_questions()?;
//!     let mut store = JsonFileStore::new(".webdev-quiz");
//!     let username = webdev_quiz::authenticate(&mut store, Some("alice"))?;
//!
//!     let app = App::new(questions, Box::new(store), username);
//!     Quiz::new(app).run()?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod data;
pub mod logging;
pub mod models;
pub mod scoring;
pub mod session;
pub mod store;
pub mod terminal;
mod ui;
pub mod view;

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tracing::debug;

pub use app::{App, AppState};
pub use data::LoadError;
pub use models::{Question, QuestionSet};
pub use scoring::ScoreResult;
pub use session::{Phase, QuizSession, SessionError};
pub use store::{Store, StoreError};

use models::{validate_username, UsernameError};
use store::records;

const TIMER_REFRESH: Duration = Duration::from_millis(250);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading questions.
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// Error reading or writing stored records.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),
    /// No identity is stored and none was given.
    #[error("Please login first to access the quiz")]
    NotLoggedIn,
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Resolves the current user.
///
/// A given `username` is validated and stored as the new identity; otherwise
/// the stored identity is required.
pub fn authenticate<S: Store + ?Sized>(
    store: &mut S,
    username: Option<&str>,
) -> Result<String, QuizError> {
    match username {
        Some(name) => {
            let name = validate_username(name)?;
            records::write_identity(store, name)?;
            Ok(name.to_string())
        }
        None => records::read_identity(store).ok_or(QuizError::NotLoggedIn),
    }
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app);
        terminal::restore()?;
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Redraw periodically so the timer keeps ticking.
        if app.preferences().show_timer && !event::poll(TIMER_REFRESH)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }

            if app.take_bell() {
                let mut stdout = io::stdout();
                stdout.write_all(b"\x07")?;
                stdout.flush()?;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }

    match app.state() {
        AppState::ResumePrompt => handle_resume_input(app, key),
        AppState::Quiz if app.session().is_submitted() => handle_locked_quiz_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Review => handle_review_input(app, key),
        AppState::Results => handle_result_input(app, key),
    }

    false
}

fn handle_resume_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.accept_resume(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.decline_resume(),
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    let outcome = match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            Ok(())
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            Ok(())
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
        KeyCode::Char(c @ 'a'..='d') => app.choose(c as usize - 'a' as usize),
        KeyCode::Char(c @ '1'..='4') => app.choose(c as usize - '1' as usize),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => {
            app.next_question();
            Ok(())
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => {
            app.previous_question();
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(err) = outcome {
        debug!(error = %err, "ignored quiz input");
    }
}

fn handle_locked_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.next_question(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.previous_question(),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Esc => app.show_results(),
        _ => {}
    }
}

fn handle_review_input(app: &mut App, key: KeyCode) {
    let outcome = match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.review_cursor_down();
            Ok(())
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.review_cursor_up();
            Ok(())
        }
        KeyCode::Enter | KeyCode::Char('e') => app.edit_reviewed_question(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.submit().map(|_| ()),
        _ => Ok(()),
    };

    if let Err(err) = outcome {
        debug!(error = %err, "ignored review input");
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('b') | KeyCode::Char('B') => app.browse_answers(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn app() -> App {
        let questions = QuestionSet::new(vec![
            Question::new("first", ["a", "b", "c", "d"], 0),
            Question::new("second", ["a", "b", "c", "d"], 1),
        ])
        .unwrap();
        App::new(questions, Box::new(MemoryStore::new()), "alice".to_string())
    }

    #[test]
    fn test_authenticate_requires_identity() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            authenticate(&mut store, None),
            Err(QuizError::NotLoggedIn)
        ));

        assert_eq!(authenticate(&mut store, Some("  carol ")).unwrap(), "carol");
        assert_eq!(authenticate(&mut store, None).unwrap(), "carol");
        assert!(matches!(
            authenticate(&mut store, Some("")),
            Err(QuizError::Username(UsernameError::Empty))
        ));
    }

    #[test]
    fn test_keyboard_walkthrough() {
        let mut app = app();

        assert!(!handle_input(&mut app, KeyCode::Char('a')));
        assert!(!handle_input(&mut app, KeyCode::Char('l')));
        assert!(!handle_input(&mut app, KeyCode::Char('3')));
        assert!(!handle_input(&mut app, KeyCode::Char('l')));
        assert_eq!(app.state(), AppState::Review);

        assert!(!handle_input(&mut app, KeyCode::Char('s')));
        assert_eq!(app.state(), AppState::Results);
        assert_eq!(app.session().answers(), &[Some(0), Some(2)]);
        assert_eq!(app.session().score(), Some(ScoreResult { correct: 1, total: 2 }));

        assert!(!handle_input(&mut app, KeyCode::Char('b')));
        assert_eq!(app.state(), AppState::Quiz);
        assert!(!handle_input(&mut app, KeyCode::Char('a')));
        assert_eq!(app.session().answers(), &[Some(0), Some(2)]);

        assert!(!handle_input(&mut app, KeyCode::Esc));
        assert!(!handle_input(&mut app, KeyCode::Char('r')));
        assert_eq!(app.session().answers(), &[None, None]);
        assert!(handle_input(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_review_enter_edits_question() {
        let mut app = app();
        handle_input(&mut app, KeyCode::Right);
        handle_input(&mut app, KeyCode::Right);
        assert_eq!(app.state(), AppState::Review);

        handle_input(&mut app, KeyCode::Down);
        handle_input(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), AppState::Quiz);
        assert_eq!(app.session().current_index(), 1);
    }
}
