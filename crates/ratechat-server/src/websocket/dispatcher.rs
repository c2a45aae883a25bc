//! Per-connection read loop.
//!
//! The dispatcher is transport-agnostic: it consumes a stream of
//! [`Inbound`] results and writes replies through the connection's
//! outbound queue. The axum handler adapts the socket into that stream.
//!
//! Lifecycle: register (identity fixed) → dispatch frames until the stream
//! ends, a close frame arrives, or a read fails → unregister. Unregistration
//! lives in a drop guard so it also runs when the task is cancelled.

use std::fmt::Display;
use std::pin::pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use ratechat_core::constants::MAX_DAYS_MESSAGE;
use ratechat_core::{ConnectionId, ExchangeError, ExchangeQuery};
use ratechat_logging::{CommandLog, CommandRecord};
use ratechat_rates::RangeAggregator;
use tracing::{debug, info, warn};

use super::command::{Frame, classify};
use super::connection::ClientConnection;
use super::registry::ConnectionRegistry;
use crate::metrics::{EXCHANGE_COMMANDS_TOTAL, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL};

/// One inbound transport event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    /// A text frame.
    Text(String),
    /// The peer asked to close.
    Close,
    /// Control or binary frame with no relay meaning.
    Ignored,
}

/// Shared collaborators for every connection's read loop.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
    aggregator: RangeAggregator,
    command_log: Arc<dyn CommandLog>,
}

/// Unregisters the connection when dropped.
struct Registration {
    registry: Arc<ConnectionRegistry>,
    id: ConnectionId,
}

impl Drop for Registration {
    fn drop(&mut self) {
        if self.registry.unregister(&self.id) {
            metrics::counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
        }
    }
}

impl Dispatcher {
    /// Build a dispatcher over shared state.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        aggregator: RangeAggregator,
        command_log: Arc<dyn CommandLog>,
    ) -> Self {
        Self {
            registry,
            aggregator,
            command_log,
        }
    }

    /// The registry connections are added to.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Serve one connection until its inbound stream finishes.
    pub async fn run<S, E>(&self, conn: Arc<ClientConnection>, inbound: S)
    where
        S: Stream<Item = Result<Inbound, E>>,
        E: Display,
    {
        let identity = self.registry.register(Arc::clone(&conn));
        let _registration = Registration {
            registry: Arc::clone(&self.registry),
            id: conn.id.clone(),
        };
        metrics::counter!(WS_CONNECTIONS_TOTAL).increment(1);
        info!(conn_id = %conn.id, %identity, "client connected");

        let mut inbound = pin!(inbound);
        while let Some(event) = inbound.next().await {
            match event {
                Ok(Inbound::Text(text)) => self.dispatch(&conn, &text).await,
                Ok(Inbound::Close) => {
                    debug!(conn_id = %conn.id, "close frame received");
                    break;
                }
                Ok(Inbound::Ignored) => {}
                Err(e) => {
                    warn!(conn_id = %conn.id, error = %e, "read failed, closing connection");
                    break;
                }
            }
        }

        info!(
            conn_id = %conn.id,
            %identity,
            age_secs = conn.age().as_secs(),
            "client disconnected"
        );
    }

    async fn dispatch(&self, conn: &ClientConnection, text: &str) {
        match classify(text) {
            Frame::Broadcast(message) => {
                debug!(conn_id = %conn.id, "broadcast frame");
                let _ = self.registry.broadcast(&conn.id, &message);
            }
            Frame::Exchange(query) => {
                debug!(conn_id = %conn.id, num_days = query.num_days, "exchange frame");
                self.exchange(conn, text, &query).await;
            }
        }
    }

    async fn exchange(&self, conn: &ClientConnection, raw: &str, query: &ExchangeQuery) {
        if let Err(e) = self.command_log.record(&CommandRecord::now(raw.trim())).await {
            warn!(error = %e, "failed to write command log");
        }

        let reply = match self.aggregator.collect(query.num_days, &query.currencies).await {
            Ok(result) => match result.to_json() {
                Ok(json) => {
                    metrics::counter!(EXCHANGE_COMMANDS_TOTAL, "outcome" => "ok").increment(1);
                    json
                }
                Err(e) => {
                    warn!(error = %e, "failed to serialize exchange result");
                    metrics::counter!(EXCHANGE_COMMANDS_TOTAL, "outcome" => "error").increment(1);
                    return;
                }
            },
            Err(ExchangeError::MaxDaysExceeded { requested, max }) => {
                info!(conn_id = %conn.id, requested, max, "exchange rejected");
                metrics::counter!(EXCHANGE_COMMANDS_TOTAL, "outcome" => "rejected").increment(1);
                MAX_DAYS_MESSAGE.to_string()
            }
        };

        if !conn.send_reply(reply.into()).await {
            warn!(conn_id = %conn.id, "writer gone, exchange reply not delivered");
        }
    }
}
