//! Data Transfer Objects (DTOs) for the relay protocol.
//!
//! DTOs are organized by concern:
//! - `websocket`: event payloads exchanged over the WebSocket connection
//! - `lenient`: deserializers that coerce untrusted fields instead of failing
//! - `conversion`: DTO ↔ domain conversions

pub mod conversion;
pub mod lenient;
pub mod websocket;
