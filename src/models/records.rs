//! Records persisted between runs.
//!
//! Everything here is read back from disk, so deserialization is tolerant:
//! a field with the wrong shape falls back to its default instead of failing
//! the whole record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{Question, NUM_OPTIONS};
use crate::scoring::ScoreResult;

/// Username recorded in history when no identity is stored.
pub const GUEST_USERNAME: &str = "Guest";

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Partially completed attempt, saved after every answer so it can be resumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub current_question_index: usize,
    pub user_answers: Vec<Option<usize>>,
    pub start_time: DateTime<Utc>,
    pub questions_total: usize,
}

impl ProgressSnapshot {
    /// Whether this snapshot can be restored onto a question set of `question_count`.
    pub fn fits(&self, question_count: usize) -> bool {
        self.questions_total == question_count
            && self.user_answers.len() == question_count
            && self.current_question_index < question_count
            && self
                .user_answers
                .iter()
                .flatten()
                .all(|choice| *choice < NUM_OPTIONS)
    }
}

/// One completed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub username: String,
    pub timestamp: DateTime<Utc>,
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub answers: Vec<Option<usize>>,
}

impl HistoryEntry {
    pub fn new(
        username: impl Into<String>,
        result: ScoreResult,
        answers: &[Option<usize>],
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            username: username.into(),
            timestamp,
            score: result.correct,
            total: result.total,
            percentage: result.percentage(),
            answers: answers.to_vec(),
        }
    }
}

/// Per-question counters across all attempts, keyed by question index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionPerformance {
    pub correct: u64,
    pub incorrect: u64,
    pub total: u64,
}

/// Running totals across every submitted attempt.
///
/// Updated incrementally on submission and never rebuilt from history, so
/// deleting history entries does not change these numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    #[serde(deserialize_with = "or_default")]
    pub total_quizzes: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_questions_answered: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_correct: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_incorrect: u64,
    #[serde(deserialize_with = "or_default")]
    pub average_score: f64,
    #[serde(deserialize_with = "or_default")]
    pub best_score: usize,
    #[serde(deserialize_with = "or_default")]
    pub worst_score: usize,
    #[serde(deserialize_with = "or_default")]
    pub question_performance: BTreeMap<usize, QuestionPerformance>,
    #[serde(deserialize_with = "or_default")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Statistics {
    /// Folds one submitted attempt into the totals.
    pub fn record(
        &mut self,
        questions: &[Question],
        answers: &[Option<usize>],
        result: ScoreResult,
        at: DateTime<Utc>,
    ) {
        let score = result.correct;
        let total = result.total as u64;

        self.total_quizzes += 1;
        self.total_questions_answered += total;
        self.total_correct += score as u64;
        self.total_incorrect += total.saturating_sub(score as u64);

        if score > self.best_score || self.best_score == 0 {
            self.best_score = score;
        }
        if score < self.worst_score || self.worst_score == 0 || self.total_quizzes == 1 {
            self.worst_score = score;
        }

        // Scaled by the current set length, not the length each attempt had.
        self.average_score = if self.total_questions_answered == 0 {
            0.0
        } else {
            let ratio = self.total_correct as f64 / self.total_questions_answered as f64;
            round_to_hundredths(ratio * questions.len() as f64)
        };

        for (index, question) in questions.iter().enumerate() {
            let counters = self.question_performance.entry(index).or_default();
            counters.total += 1;
            match answers.get(index).copied().flatten() {
                Some(choice) if question.is_correct(choice) => counters.correct += 1,
                _ => counters.incorrect += 1,
            }
        }

        self.last_updated = Some(at);
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// User preferences. Missing or malformed fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    #[serde(deserialize_with = "or_default")]
    pub theme: Theme,
    #[serde(deserialize_with = "or_default")]
    pub sound_enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub auto_advance: bool,
    #[serde(deserialize_with = "or_default")]
    pub show_timer: bool,
    #[serde(deserialize_with = "or_default")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A partial preferences change; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub sound_enabled: Option<bool>,
    pub auto_advance: Option<bool>,
    pub show_timer: Option<bool>,
}

impl PreferencesUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Preferences {
    pub fn merge(mut self, update: PreferencesUpdate, at: DateTime<Utc>) -> Self {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(sound_enabled) = update.sound_enabled {
            self.sound_enabled = sound_enabled;
        }
        if let Some(auto_advance) = update.auto_advance {
            self.auto_advance = auto_advance;
        }
        if let Some(show_timer) = update.show_timer {
            self.show_timer = show_timer;
        }
        self.last_updated = Some(at);
        self
    }
}
