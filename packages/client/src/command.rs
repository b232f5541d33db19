//! Input command parsing for the client.
//!
//! This module contains pure functions that implement input handling
//! without side effects, making them easy to test.

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Plain text to send as a chat message
    Message(String),
    /// `/typing on` / `/typing off`
    Typing(bool),
    /// `/seen` — notify others that messages were viewed
    Seen,
    /// `/quit` — end the session
    Quit,
    /// An unrecognized slash command (shown to the user, never sent)
    Unknown(String),
}

/// Parse one input line into a command.
///
/// Returns `None` for empty or whitespace-only lines. Anything not starting
/// with `/` is a chat message.
pub fn parse_input(line: &str) -> Option<InputCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if !line.starts_with('/') {
        return Some(InputCommand::Message(line.to_string()));
    }

    match line {
        "/quit" | "/exit" => Some(InputCommand::Quit),
        "/seen" => Some(InputCommand::Seen),
        "/typing on" => Some(InputCommand::Typing(true)),
        "/typing off" => Some(InputCommand::Typing(false)),
        other => Some(InputCommand::Unknown(other.to_string())),
    }
}
