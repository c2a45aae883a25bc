//! WebSocket connection state, identity, broadcast, and frame dispatch.

pub mod command;
pub mod connection;
pub mod dispatcher;
pub mod names;
pub mod registry;
