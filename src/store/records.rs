//! Typed access to the persisted records.
//!
//! Reads never fail: a missing, unreadable or malformed value is logged and
//! replaced by the record's default. Writes report their errors so callers can
//! decide whether they matter.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{
    HistoryEntry, Preferences, PreferencesUpdate, ProgressSnapshot, Question, Statistics,
};
use crate::scoring::ScoreResult;

use super::{Store, StoreError, StoreKey};

fn read_json<S, T>(store: &S, key: StoreKey) -> Option<T>
where
    S: Store + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(%key, error = %err, "failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(%key, error = %err, "ignoring malformed stored value");
            None
        }
    }
}

/// Like [`read_json`], but only accepts a JSON object. Derived struct
/// deserializers would otherwise map an array onto the fields by position.
fn read_record<S, T>(store: &S, key: StoreKey) -> Option<T>
where
    S: Store + ?Sized,
    T: DeserializeOwned,
{
    let value = read_json::<_, Value>(store, key)?;
    if !value.is_object() {
        warn!(%key, "ignoring stored value that is not an object");
        return None;
    }

    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(%key, error = %err, "ignoring malformed stored value");
            None
        }
    }
}

fn write_json<S, T>(store: &mut S, key: StoreKey, value: &T) -> Result<(), StoreError>
where
    S: Store + ?Sized,
    T: Serialize,
{
    let json = serde_json::to_string(value)
        .map_err(|source| StoreError::Serialize { key, source })?;
    store.write(key, &json)?;
    debug!(%key, bytes = json.len(), "stored value");
    Ok(())
}

pub fn read_identity<S: Store + ?Sized>(store: &S) -> Option<String> {
    read_json::<_, String>(store, StoreKey::Identity).filter(|name| !name.trim().is_empty())
}

/// Stores the current username. Callers validate it first.
pub fn write_identity<S: Store + ?Sized>(store: &mut S, username: &str) -> Result<(), StoreError> {
    write_json(store, StoreKey::Identity, &username)
}

pub fn clear_identity<S: Store + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.delete(StoreKey::Identity)
}

pub fn read_progress<S: Store + ?Sized>(store: &S) -> Option<ProgressSnapshot> {
    read_record(store, StoreKey::Progress)
}

pub fn save_progress<S: Store + ?Sized>(
    store: &mut S,
    snapshot: &ProgressSnapshot,
) -> Result<(), StoreError> {
    write_json(store, StoreKey::Progress, snapshot)
}

pub fn clear_progress<S: Store + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.delete(StoreKey::Progress)
}

/// Every history entry that parses, oldest first.
pub fn read_history<S: Store + ?Sized>(store: &S) -> Vec<HistoryEntry> {
    let values = stored_history(store);

    let total = values.len();
    let entries: Vec<HistoryEntry> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    if entries.len() < total {
        warn!(
            dropped = total - entries.len(),
            "skipping malformed history entries"
        );
    }

    entries
}

/// Raw history entries. Rewrites go through these so entries that fail to
/// parse are carried over instead of lost.
fn stored_history<S: Store + ?Sized>(store: &S) -> Vec<Value> {
    if let Some(values) = read_json::<_, Vec<Value>>(store, StoreKey::History) {
        return values;
    }

    if matches!(store.read(StoreKey::History), Ok(Some(_))) {
        warn!("stored history is not a list and will be replaced on the next write");
    }
    Vec::new()
}

pub fn append_history<S: Store + ?Sized>(
    store: &mut S,
    entry: HistoryEntry,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(&entry).map_err(|source| StoreError::Serialize {
        key: StoreKey::History,
        source,
    })?;

    let mut history = stored_history(store);
    history.push(value);
    write_json(store, StoreKey::History, &history)
}

/// Removes the entry with `id`. Returns whether anything was removed.
pub fn delete_history_entry<S: Store + ?Sized>(
    store: &mut S,
    id: &str,
) -> Result<bool, StoreError> {
    let mut history = stored_history(store);
    let before = history.len();
    history.retain(|value| value.get("id").and_then(Value::as_str) != Some(id));

    if history.len() == before {
        return Ok(false);
    }

    write_json(store, StoreKey::History, &history)?;
    Ok(true)
}

pub fn clear_history<S: Store + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.delete(StoreKey::History)
}

pub fn read_statistics<S: Store + ?Sized>(store: &S) -> Statistics {
    read_record(store, StoreKey::Statistics).unwrap_or_default()
}

/// Folds a submitted attempt into the stored statistics and returns the new totals.
pub fn record_statistics<S: Store + ?Sized>(
    store: &mut S,
    questions: &[Question],
    answers: &[Option<usize>],
    result: ScoreResult,
    at: DateTime<Utc>,
) -> Result<Statistics, StoreError> {
    let mut stats = read_statistics(store);
    stats.record(questions, answers, result, at);
    write_json(store, StoreKey::Statistics, &stats)?;
    Ok(stats)
}

pub fn clear_statistics<S: Store + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.delete(StoreKey::Statistics)
}

pub fn read_preferences<S: Store + ?Sized>(store: &S) -> Preferences {
    read_record(store, StoreKey::Preferences).unwrap_or_default()
}

/// Merges `update` over the stored preferences and saves the result.
pub fn update_preferences<S: Store + ?Sized>(
    store: &mut S,
    update: PreferencesUpdate,
) -> Result<Preferences, StoreError> {
    let preferences = read_preferences(store).merge(update, Utc::now());
    write_json(store, StoreKey::Preferences, &preferences)?;
    Ok(preferences)
}

pub fn reset_preferences<S: Store + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.delete(StoreKey::Preferences)
}
