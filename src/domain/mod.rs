//! Domain primitives for activity tracking.
//!
//! Identifiers arrive from shell scripts running `whoami` on arbitrary
//! devices, so [`UserId`] is the only way a raw string becomes a store key.

pub mod badges;

pub use badges::{Badge, BadgeInfo};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a user identifier, measured in characters before sanitizing.
pub const MAX_USER_ID_LEN: usize = 50;

/// Errors produced when turning raw input into a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    #[error("User ID is required")]
    Empty,

    #[error("User ID must be at most {MAX_USER_ID_LEN} characters")]
    TooLong,
}

/// Sanitized user identifier.
///
/// Every character outside `[A-Za-z0-9_.-]` is replaced with `_`, so two raw
/// inputs that differ only in such characters map to the same user. Length
/// and replacement both count UTF-16 code units, so a character outside the
/// Basic Multilingual Plane counts as two and becomes `__`.
///
/// # Examples
///
/// ```rust
/// use upsen::domain::UserId;
///
/// let id = UserId::parse("u0_a123@termux").unwrap();
/// assert_eq!(id.as_str(), "u0_a123_termux");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Validates length and sanitizes the character set.
    pub fn parse(raw: &str) -> Result<Self, UserIdError> {
        if raw.is_empty() {
            return Err(UserIdError::Empty);
        }

        if raw.encode_utf16().count() > MAX_USER_ID_LEN {
            return Err(UserIdError::TooLong);
        }

        Ok(Self(sanitize(raw)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
            out.push(c);
        } else {
            out.extend(std::iter::repeat_n('_', c.len_utf16()));
        }
    }
    out
}
