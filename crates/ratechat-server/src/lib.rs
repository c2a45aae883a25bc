//! # ratechat-server
//!
//! Axum HTTP + `WebSocket` relay.
//!
//! - `GET /ws`: one full-duplex chat connection per client
//! - `GET /health`: liveness and connection count
//! - `GET /metrics`: Prometheus text
//! - [`ConnectionRegistry`](websocket::registry::ConnectionRegistry): live
//!   connections, identities, and broadcast fan-out
//! - [`Dispatcher`](websocket::dispatcher::Dispatcher): per-connection read
//!   loop that broadcasts chat text and answers `exchange` commands
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod health;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod websocket;

pub use config::ServerConfig;
pub use errors::ServerError;
pub use server::RelayServer;
