use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::models::{
    HistoryEntry, Preferences, ProgressSnapshot, QuestionSet, GUEST_USERNAME, NUM_OPTIONS,
};
use crate::scoring::ScoreResult;
use crate::session::{QuizSession, SessionError};
use crate::store::{records, Store};
use crate::view::{self, QuestionView, ResultsView, ReviewView};

/// Which screen the application is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// A saved attempt was found; asking whether to continue it.
    ResumePrompt,
    Quiz,
    Review,
    Results,
}

/// Drives a quiz session and keeps the store in step with it.
///
/// Every user intent goes through here. Store failures are logged and
/// swallowed so the quiz stays usable without persistence.
pub struct App {
    questions: QuestionSet,
    session: QuizSession,
    store: Box<dyn Store>,
    username: String,
    preferences: Preferences,
    pending_resume: Option<ProgressSnapshot>,
    showing_results: bool,
    selected_option: usize,
    review_cursor: usize,
    result_scroll: usize,
    finished_at: Option<DateTime<Utc>>,
    bell: bool,
}

impl App {
    pub fn new(questions: QuestionSet, mut store: Box<dyn Store>, username: String) -> Self {
        let preferences = records::read_preferences(store.as_ref());
        let session = QuizSession::new(&questions);
        let username = if username.trim().is_empty() {
            GUEST_USERNAME.to_string()
        } else {
            username
        };

        let pending_resume = match records::read_progress(store.as_ref()) {
            Some(snapshot) if snapshot.fits(questions.len()) => Some(snapshot),
            Some(snapshot) => {
                info!(
                    saved = snapshot.questions_total,
                    current = questions.len(),
                    "discarding progress saved for a different question set"
                );
                if let Err(err) = records::clear_progress(store.as_mut()) {
                    warn!(error = %err, "failed to clear stale progress");
                }
                None
            }
            None => None,
        };

        Self {
            questions,
            session,
            store,
            username,
            preferences,
            pending_resume,
            showing_results: false,
            selected_option: 0,
            review_cursor: 0,
            result_scroll: 0,
            finished_at: None,
            bell: false,
        }
    }

    pub fn state(&self) -> AppState {
        if self.pending_resume.is_some() {
            AppState::ResumePrompt
        } else if self.session.is_reviewing() {
            AppState::Review
        } else if self.session.is_submitted() && self.showing_results {
            AppState::Results
        } else {
            AppState::Quiz
        }
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn pending_resume(&self) -> Option<&ProgressSnapshot> {
        self.pending_resume.as_ref()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn review_cursor(&self) -> usize {
        self.review_cursor
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn question_view(&self) -> QuestionView<'_> {
        view::question_view(&self.questions, &self.session)
    }

    pub fn review_view(&self) -> ReviewView<'_> {
        view::review_view(&self.questions, &self.session)
    }

    pub fn results_view(&self) -> Option<ResultsView<'_>> {
        view::results_view(&self.questions, &self.session)
    }

    /// Time spent on the current attempt, frozen once it is submitted.
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        let end = self.finished_at.unwrap_or(now);
        (end - self.session.started_at()).max(TimeDelta::zero())
    }

    /// Returns whether a bell was requested since the last call.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    pub fn accept_resume(&mut self) {
        let Some(snapshot) = self.pending_resume.take() else {
            return;
        };

        match QuizSession::resume(&self.questions, &snapshot) {
            Some(session) => {
                info!(
                    index = snapshot.current_question_index,
                    "resuming saved attempt"
                );
                self.session = session;
                self.sync_cursor();
            }
            None => self.decline_resume(),
        }
    }

    pub fn decline_resume(&mut self) {
        self.pending_resume = None;
        self.clear_progress();
    }

    pub fn select_next_option(&mut self) {
        self.selected_option = (self.selected_option + 1) % NUM_OPTIONS;
    }

    pub fn select_previous_option(&mut self) {
        self.selected_option = (self.selected_option + NUM_OPTIONS - 1) % NUM_OPTIONS;
    }

    /// Answers the current question with the highlighted option.
    pub fn submit_answer(&mut self) -> Result<(), SessionError> {
        self.choose(self.selected_option)
    }

    /// Answers the current question with `choice` and saves progress.
    pub fn choose(&mut self, choice: usize) -> Result<(), SessionError> {
        let index = self.session.current_index();
        self.session.select_answer(index, choice)?;
        self.selected_option = choice;
        debug!(question = index, choice, "answer selected");

        self.save_progress();
        if self.preferences.sound_enabled {
            self.bell = true;
        }
        if self.preferences.auto_advance {
            self.next_question();
        }
        Ok(())
    }

    pub fn next_question(&mut self) {
        self.session.go_next();
        if self.session.is_reviewing() {
            self.review_cursor = 0;
        }
        self.sync_cursor();
    }

    pub fn previous_question(&mut self) {
        self.session.go_previous();
        self.sync_cursor();
    }

    pub fn review_cursor_down(&mut self) {
        let last = self.questions.last_index();
        self.review_cursor = (self.review_cursor + 1).min(last);
    }

    pub fn review_cursor_up(&mut self) {
        self.review_cursor = self.review_cursor.saturating_sub(1);
    }

    /// Leaves review to edit the question under the review cursor.
    pub fn edit_reviewed_question(&mut self) -> Result<(), SessionError> {
        self.session.jump_to(self.review_cursor)?;
        self.sync_cursor();
        Ok(())
    }

    /// Locks in the answers, then records history and statistics.
    pub fn submit(&mut self) -> Result<ScoreResult, SessionError> {
        let result = self.session.submit(&self.questions)?;
        let now = Utc::now();
        self.finished_at = Some(now);
        self.showing_results = true;
        self.result_scroll = 0;

        info!(
            correct = result.correct,
            total = result.total,
            unanswered = self.session.unanswered_count(),
            "quiz submitted"
        );

        self.clear_progress();

        let entry = HistoryEntry::new(&self.username, result, self.session.answers(), now);
        if let Err(err) = records::append_history(self.store.as_mut(), entry) {
            warn!(error = %err, "failed to save quiz result to history");
        }

        if let Err(err) = records::record_statistics(
            self.store.as_mut(),
            &self.questions,
            self.session.answers(),
            result,
            now,
        ) {
            warn!(error = %err, "failed to update statistics");
        }

        Ok(result)
    }

    /// Starts a new attempt from the first question.
    pub fn restart(&mut self) {
        self.session.restart();
        self.showing_results = false;
        self.selected_option = 0;
        self.review_cursor = 0;
        self.result_scroll = 0;
        self.finished_at = None;
        self.clear_progress();
        info!("quiz restarted");
    }

    /// From the results screen, step through the locked questions.
    pub fn browse_answers(&mut self) {
        if self.session.is_submitted() {
            self.showing_results = false;
        }
    }

    pub fn show_results(&mut self) {
        if self.session.is_submitted() {
            self.showing_results = true;
        }
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.questions.len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn sync_cursor(&mut self) {
        self.selected_option = self
            .session
            .answer(self.session.current_index())
            .unwrap_or(0);
    }

    fn save_progress(&mut self) {
        if self.session.is_submitted() {
            return;
        }
        if let Err(err) = records::save_progress(self.store.as_mut(), &self.session.snapshot()) {
            warn!(error = %err, "failed to save progress");
        }
    }

    fn clear_progress(&mut self) {
        if let Err(err) = records::clear_progress(self.store.as_mut()) {
            warn!(error = %err, "failed to clear progress");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PreferencesUpdate, Question};
    use crate::store::{MemoryStore, StoreError, StoreKey};

    fn question_set() -> QuestionSet {
        QuestionSet::new(vec![
            Question::new("first", ["a", "b", "c", "d"], 0),
            Question::new("second", ["a", "b", "c", "d"], 1),
            Question::new("third", ["a", "b", "c", "d"], 2),
        ])
        .unwrap()
    }

    fn app_with(store: MemoryStore) -> App {
        App::new(question_set(), Box::new(store), "alice".to_string())
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    impl Store for BrokenStore {
        fn read(&self, _key: StoreKey) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn write(&mut self, key: StoreKey, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: key.as_str().into(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn delete(&mut self, key: StoreKey) -> Result<(), StoreError> {
            self.write(key, "")
        }
    }

    #[test]
    fn test_new_app_starts_on_first_question() {
        let app = app_with(MemoryStore::new());
        assert_eq!(app.state(), AppState::Quiz);
        assert_eq!(app.session().current_index(), 0);
        assert_eq!(app.selected_option(), 0);
    }

    #[test]
    fn test_blank_username_recorded_as_guest() {
        let mut app = App::new(question_set(), Box::new(MemoryStore::new()), String::new());
        assert_eq!(app.username(), GUEST_USERNAME);
        app.submit().unwrap();
        assert_eq!(records::read_history(app.store())[0].username, GUEST_USERNAME);
    }

    #[test]
    fn test_answer_saves_progress() {
        let mut app = app_with(MemoryStore::new());
        app.select_next_option();
        app.select_next_option();
        app.submit_answer().unwrap();

        let snapshot = records::read_progress(app.store()).unwrap();
        assert_eq!(snapshot.user_answers, vec![Some(2), None, None]);
        assert_eq!(snapshot.questions_total, 3);
    }

    #[test]
    fn test_option_cursor_wraps() {
        let mut app = app_with(MemoryStore::new());
        app.select_previous_option();
        assert_eq!(app.selected_option(), 3);
        app.select_next_option();
        assert_eq!(app.selected_option(), 0);
    }

    #[test]
    fn test_cursor_follows_saved_answer() {
        let mut app = app_with(MemoryStore::new());
        app.choose(3).unwrap();
        app.next_question();
        assert_eq!(app.selected_option(), 0);
        app.previous_question();
        assert_eq!(app.selected_option(), 3);
    }

    #[test]
    fn test_review_then_edit_then_submit() {
        let mut app = app_with(MemoryStore::new());
        app.next_question();
        app.next_question();
        app.next_question();
        assert_eq!(app.state(), AppState::Review);
        assert_eq!(app.review_view().unanswered, 3);

        app.review_cursor_down();
        app.edit_reviewed_question().unwrap();
        assert_eq!(app.state(), AppState::Quiz);
        assert_eq!(app.session().current_index(), 1);
        app.choose(1).unwrap();

        let result = app.submit().unwrap();
        assert_eq!(result, ScoreResult { correct: 1, total: 3 });
        assert_eq!(app.state(), AppState::Results);
    }

    #[test]
    fn test_submit_records_history_and_statistics() {
        let mut app = app_with(MemoryStore::new());
        app.choose(0).unwrap();
        app.submit().unwrap();

        assert_eq!(records::read_progress(app.store()), None);

        let history = records::read_history(app.store());
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].username, "alice");
        assert_eq!(history[0].score, 1);
        assert_eq!(history[0].total, 3);
        assert_eq!(history[0].percentage, 33);
        assert_eq!(history[0].answers, vec![Some(0), None, None]);

        let stats = records::read_statistics(app.store());
        assert_eq!(stats.total_quizzes, 1);
        assert_eq!(stats.total_correct, 1);
        assert_eq!(stats.total_incorrect, 2);
    }

    #[test]
    fn test_answers_locked_after_submit() {
        let mut app = app_with(MemoryStore::new());
        app.choose(1).unwrap();
        app.submit().unwrap();

        assert_eq!(app.choose(0), Err(SessionError::AlreadySubmitted));
        assert_eq!(app.session().answers(), &[Some(1), None, None]);
        assert_eq!(records::read_progress(app.store()), None);
    }

    #[test]
    fn test_browse_answers_after_submit() {
        let mut app = app_with(MemoryStore::new());
        app.submit().unwrap();
        app.browse_answers();
        assert_eq!(app.state(), AppState::Quiz);
        assert!(app.question_view().locked);

        app.show_results();
        assert_eq!(app.state(), AppState::Results);
    }

    #[test]
    fn test_restart_clears_progress() {
        let mut app = app_with(MemoryStore::new());
        app.choose(2).unwrap();
        assert!(records::read_progress(app.store()).is_some());

        app.restart();
        assert_eq!(records::read_progress(app.store()), None);
        assert_eq!(app.session().answers(), &[None, None, None]);
        assert_eq!(app.state(), AppState::Quiz);
    }

    #[test]
    fn test_resume_offer_accepted() {
        let set = question_set();
        let mut previous = QuizSession::new(&set);
        previous.select_answer(0, 3).unwrap();
        previous.go_next();
        previous.select_answer(1, 2).unwrap();

        let mut store = MemoryStore::new();
        records::save_progress(&mut store, &previous.snapshot()).unwrap();

        let mut app = app_with(store);
        assert_eq!(app.state(), AppState::ResumePrompt);

        app.accept_resume();
        assert_eq!(app.state(), AppState::Quiz);
        assert_eq!(app.session().current_index(), 1);
        assert_eq!(app.session().answers(), &[Some(3), Some(2), None]);
        assert_eq!(app.selected_option(), 2);
    }

    #[test]
    fn test_resume_offer_declined() {
        let set = question_set();
        let mut previous = QuizSession::new(&set);
        previous.select_answer(0, 3).unwrap();

        let mut store = MemoryStore::new();
        records::save_progress(&mut store, &previous.snapshot()).unwrap();

        let mut app = app_with(store);
        app.decline_resume();
        assert_eq!(app.state(), AppState::Quiz);
        assert_eq!(app.session().answers(), &[None, None, None]);
        assert_eq!(records::read_progress(app.store()), None);
    }

    #[test]
    fn test_mismatched_progress_discarded() {
        let smaller = QuestionSet::new(vec![Question::new("only", ["a", "b", "c", "d"], 0)]).unwrap();
        let mut store = MemoryStore::new();
        records::save_progress(&mut store, &QuizSession::new(&smaller).snapshot()).unwrap();

        let app = app_with(store);
        assert_eq!(app.state(), AppState::Quiz);
        assert_eq!(records::read_progress(app.store()), None);
    }

    #[test]
    fn test_auto_advance_and_sound() {
        let mut store = MemoryStore::new();
        records::update_preferences(
            &mut store,
            PreferencesUpdate {
                auto_advance: Some(true),
                sound_enabled: Some(true),
                ..PreferencesUpdate::default()
            },
        )
        .unwrap();

        let mut app = app_with(store);
        app.choose(0).unwrap();
        assert_eq!(app.session().current_index(), 1);
        assert!(app.take_bell());
        assert!(!app.take_bell());
    }

    #[test]
    fn test_broken_store_keeps_quiz_usable() {
        let mut app = App::new(question_set(), Box::new(BrokenStore), "bob".to_string());
        app.choose(0).unwrap();
        app.next_question();
        app.choose(1).unwrap();

        let result = app.submit().unwrap();
        assert_eq!(result, ScoreResult { correct: 2, total: 3 });
        assert_eq!(app.state(), AppState::Results);

        app.restart();
        assert_eq!(app.session().answers(), &[None, None, None]);
    }

    #[test]
    fn test_elapsed_freezes_on_submit() {
        let mut app = app_with(MemoryStore::new());
        app.submit().unwrap();
        let later = Utc::now() + TimeDelta::minutes(5);
        assert!(app.elapsed(later) < TimeDelta::minutes(1));
    }

    #[test]
    fn test_result_scroll_bounds() {
        let mut app = app_with(MemoryStore::new());
        app.submit().unwrap();
        app.scroll_results_up();
        assert_eq!(app.result_scroll(), 0);
        for _ in 0..10 {
            app.scroll_results_down();
        }
        assert_eq!(app.result_scroll(), 2);
    }
}
