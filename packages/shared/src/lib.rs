//! Shared utilities for the Utakata workspace.
//!
//! Cross-cutting concerns that both the server and any future binaries need:
//! logging setup and the clock abstraction.

pub mod logger;
pub mod time;
