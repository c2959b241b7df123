//! UI 層
//!
//! HTTP / WebSocket のエンドポイントと、サーバーの起動・停止。

pub mod handler;
pub mod server;
pub mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
