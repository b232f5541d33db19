//! Value objects for the relay domain.
//!
//! Inbound payloads are untrusted, so the string value objects *coerce*
//! instead of rejecting: trim, then truncate to the character limit. Whether
//! an empty result is acceptable depends on the operation and is decided in
//! the usecase layer.

use std::fmt;

/// Maximum length of a display name, in characters
pub const DISPLAY_NAME_MAX_CHARS: usize = 24;

/// Maximum length of a message text, in characters
pub const MESSAGE_TEXT_MAX_CHARS: usize = 350;

fn trim_and_truncate(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        // Truncation counts characters, not bytes, so multi-byte names
        // cannot split a code point.
        trimmed.chars().take(max_chars).collect()
    }
}

/// Server-assigned identifier of one live connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Wrap an existing identifier (used by tests and DTO conversion)
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh connection id (UUID v4)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Self-asserted display name of a participant (≤24 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Coerce an untrusted string into a display name.
    ///
    /// Trims surrounding whitespace and truncates to
    /// [`DISPLAY_NAME_MAX_CHARS`] characters. The result may be empty;
    /// operations that require a non-empty name check [`Self::is_empty`].
    pub fn coerce(raw: &str) -> Self {
        Self(trim_and_truncate(raw, DISPLAY_NAME_MAX_CHARS))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a chat message (≤350 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Coerce an untrusted string into a message text.
    ///
    /// Trims surrounding whitespace and truncates to
    /// [`MESSAGE_TEXT_MAX_CHARS`] characters. Empty results are rejected by
    /// the send-message usecase, not here.
    pub fn coerce(raw: &str) -> Self {
        Self(trim_and_truncate(raw, MESSAGE_TEXT_MAX_CHARS))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
