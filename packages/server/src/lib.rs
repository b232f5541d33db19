//! kotatsu relay library.
//!
//! A single-process realtime message relay: bounded shared history, presence,
//! typing indicators, last-seen tracking and seen receipts, fanned out to all
//! connected WebSocket clients. Message history can optionally be persisted
//! to Firestore; without credentials the relay runs memory-only.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
