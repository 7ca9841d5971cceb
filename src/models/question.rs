use serde::Deserialize;

/// Number of answer options every question carries.
pub const NUM_OPTIONS: usize = 4;

/// A single multiple-choice question as it appears in the question document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub options: [String; NUM_OPTIONS],
    #[serde(rename = "correct")]
    pub correct_index: usize,
}

impl Question {
    pub fn new(text: impl Into<String>, options: [&str; NUM_OPTIONS], correct_index: usize) -> Self {
        Self {
            text: text.into(),
            options: options.map(str::to_string),
            correct_index,
        }
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        self.correct_index == choice
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// The option text for `choice`, if it is in range.
    pub fn option(&self, choice: usize) -> Option<&str> {
        self.options.get(choice).map(String::as_str)
    }
}
