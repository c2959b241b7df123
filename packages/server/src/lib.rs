//! Utakata ephemeral chat server library.
//!
//! Rooms resolved by topic slug (optionally password-gated), messages with
//! per-message TTL expiry, heartbeat-based room presence, and a 1:1
//! connection handshake that provisions private rooms.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
