//! MessageStore implementations.

mod firestore;

pub use firestore::{FirestoreConfig, FirestoreMessageStore};
