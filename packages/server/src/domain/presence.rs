//! Presence registries: who is online, who is typing, who was last seen.
//!
//! These are plain owned structs with narrow contracts, mutated only through
//! the usecase layer. Clients only ever receive derived snapshots.

use std::collections::{BTreeSet, HashMap};

use super::value_object::{ConnectionId, DisplayName};

/// Mapping from live connection to its registered display name.
///
/// An entry exists only for connections that have sent a registration event.
/// A name may be claimed by several connections at once (multiple tabs);
/// a connection holds at most one name.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    entries: HashMap<ConnectionId, DisplayName>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name to a connection, overwriting any prior name.
    ///
    /// Callers coerce and reject empty names before calling this.
    pub fn register(&mut self, connection_id: ConnectionId, name: DisplayName) {
        self.entries.insert(connection_id, name);
    }

    /// Remove a connection's entry, returning its name if it was registered
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<DisplayName> {
        self.entries.remove(connection_id)
    }

    /// The name currently registered for a connection, if any
    pub fn name_of(&self, connection_id: &ConnectionId) -> Option<&DisplayName> {
        self.entries.get(connection_id)
    }

    /// Distinct registered names, sorted for consistent ordering
    pub fn names(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self.entries.values().map(|n| n.as_str()).collect();
        distinct.into_iter().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One entry of the typing snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingEntry {
    pub connection_id: ConnectionId,
    pub name: DisplayName,
}

/// Connections currently signaling "typing", in insertion order.
///
/// Independent from [`SessionRegistry`]: a connection may type before it
/// registers. The stop-after-inactivity policy is a client concern; this is
/// a dumb map.
#[derive(Debug, Default)]
pub struct TypingTracker {
    entries: Vec<TypingEntry>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a connection as typing. Re-setting updates the name in place
    /// and keeps the original position.
    pub fn set(&mut self, connection_id: ConnectionId, name: DisplayName) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.connection_id == connection_id)
        {
            entry.name = name;
        } else {
            self.entries.push(TypingEntry {
                connection_id,
                name,
            });
        }
    }

    /// Clear a connection's typing state. Idempotent.
    pub fn clear(&mut self, connection_id: &ConnectionId) {
        self.entries.retain(|e| &e.connection_id != connection_id);
    }

    /// Copy of the current entries, insertion order
    pub fn snapshot(&self) -> Vec<TypingEntry> {
        self.entries.clone()
    }
}

/// Mapping from display name to the time it was last seen online.
///
/// Written on disconnect of a registered connection; last write wins. Entries
/// are never removed, so the ledger grows with the number of distinct names
/// ever seen (acceptable at this scale). Does not survive process restart.
#[derive(Debug, Default)]
pub struct LastSeenLedger {
    entries: HashMap<String, i64>,
}

impl LastSeenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a name was last seen at `millis`. Last write wins.
    pub fn record(&mut self, name: &DisplayName, millis: i64) {
        self.entries.insert(name.as_str().to_string(), millis);
    }

    /// Copy of the full ledger for broadcast
    pub fn as_map(&self) -> HashMap<String, i64> {
        self.entries.clone()
    }

    /// Last-seen time for one name, if recorded
    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries.get(name).copied()
    }
}

/// Derived presence snapshot broadcast on registration and disconnect.
///
/// `connection_count` is the raw transport-level connection count (supplied
/// by the pusher, not the registry) and may exceed the number of distinct
/// names when one person has several tabs open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub connection_count: usize,
    pub names: Vec<String>,
}
