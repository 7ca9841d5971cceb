use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::models::{Question, QuestionSet, QuestionSetError};

const EMBEDDED_QUESTIONS: &str = include_str!("questions.json");

/// Where the question document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    /// The question set compiled into the binary.
    Embedded,
    File(PathBuf),
    /// A static JSON document fetched once over HTTP(S).
    Url(String),
}

impl QuestionSource {
    /// Interprets a command-line argument as a URL when it has an HTTP scheme,
    /// otherwise as a file path.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionSource::Embedded => f.write_str("embedded questions"),
            QuestionSource::File(path) => write!(f, "{}", path.display()),
            QuestionSource::Url(url) => f.write_str(url),
        }
    }
}

/// Error type for loading the question set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{origin} is not a usable question set: {source}")]
    Invalid {
        origin: String,
        #[source]
        source: QuestionSetError,
    },
}

/// Acquires and validates the question set. This is the only asynchronous
/// step in the application; no session exists until it resolves.
pub async fn load_questions(source: &QuestionSource) -> Result<QuestionSet, LoadError> {
    let origin = source.to_string();
    let json = match source {
        QuestionSource::Embedded => EMBEDDED_QUESTIONS.to_string(),
        QuestionSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Read {
                    path: path.clone(),
                    source,
                })?
        }
        QuestionSource::Url(url) => fetch(url).await?,
    };

    let questions = parse_questions(&json, &origin)?;
    info!(source = %origin, count = questions.len(), "loaded questions");
    Ok(questions)
}

async fn fetch(url: &str) -> Result<String, LoadError> {
    let to_error = |source: reqwest::Error| LoadError::Fetch {
        url: url.to_string(),
        source,
    };

    reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(to_error)?
        .text()
        .await
        .map_err(to_error)
}

/// Parses a question document: a JSON array of `{question, options, correct}`.
pub fn parse_questions(json: &str, origin: &str) -> Result<QuestionSet, LoadError> {
    let questions: Vec<Question> =
        serde_json::from_str(json).map_err(|source| LoadError::Parse {
            origin: origin.to_string(),
            source,
        })?;

    QuestionSet::new(questions).map_err(|source| LoadError::Invalid {
        origin: origin.to_string(),
        source,
    })
}

/// The question set compiled into the binary.
pub fn embedded_questions() -> Result<QuestionSet, LoadError> {
    parse_questions(EMBEDDED_QUESTIONS, "embedded questions")
}
