mod loader;

pub use loader::{embedded_questions, load_questions, parse_questions, LoadError, QuestionSource};
