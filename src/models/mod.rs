mod identity;
mod question;
mod question_set;
mod records;

pub use identity::{validate_username, UsernameError, USERNAME_MAX_LENGTH};
pub use question::{Question, NUM_OPTIONS};
pub use question_set::{QuestionSet, QuestionSetError};
pub use records::{
    HistoryEntry, Preferences, PreferencesUpdate, ProgressSnapshot, QuestionPerformance,
    Statistics, Theme, GUEST_USERNAME,
};
