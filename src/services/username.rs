// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Username rules applied before the availability lookup.

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 20;

/// Names that would impersonate staff or collide with app routes.
const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "support",
    "moderator",
    "mod",
    "staff",
    "system",
    "spothop",
    "api",
    "help",
    "settings",
    "null",
    "undefined",
];

/// Rejected anywhere in the name.
const OFFENSIVE_SUBSTRINGS: &[&str] = &[
    "fuck", "shit", "cunt", "bitch", "whore", "slut", "nazi", "rape", "porn",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("Username must be at least 3 characters")]
    TooShort,

    #[error("Username must be 20 characters or less")]
    TooLong,

    #[error("Username can only contain letters, numbers, underscores, and periods")]
    InvalidCharacters,

    #[error("This username is reserved")]
    Reserved,

    #[error("Username contains inappropriate language")]
    Offensive,
}

/// Validate a username and return its normalized (trimmed, lowercase) form.
pub fn validate_username(raw: &str) -> Result<String, UsernameError> {
    let username = raw.trim().to_lowercase();
    let len = username.chars().count();

    if len < MIN_USERNAME_LEN {
        return Err(UsernameError::TooShort);
    }
    if len > MAX_USERNAME_LEN {
        return Err(UsernameError::TooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
    {
        return Err(UsernameError::InvalidCharacters);
    }
    if RESERVED_USERNAMES.contains(&username.as_str()) {
        return Err(UsernameError::Reserved);
    }
    if OFFENSIVE_SUBSTRINGS.iter().any(|w| username.contains(w)) {
        return Err(UsernameError::Offensive);
    }

    Ok(username)
}
