use thiserror::Error;

/// Username validation constants.
pub const USERNAME_MIN_LENGTH: usize = 1;
pub const USERNAME_MAX_LENGTH: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username must not be empty")]
    Empty,
    #[error("username must be at most {max} characters", max = USERNAME_MAX_LENGTH)]
    TooLong,
}

/// Validates a username, returning it trimmed.
pub fn validate_username(username: &str) -> Result<&str, UsernameError> {
    let trimmed = username.trim();
    let length = trimmed.chars().count();

    if length < USERNAME_MIN_LENGTH {
        return Err(UsernameError::Empty);
    }

    if length > USERNAME_MAX_LENGTH {
        return Err(UsernameError::TooLong);
    }

    Ok(trimmed)
}
