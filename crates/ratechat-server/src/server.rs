//! `RelayServer`: Axum HTTP + WebSocket server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use metrics_exporter_prometheus::PrometheusHandle;
use ratechat_logging::CommandLog;
use ratechat_rates::RangeAggregator;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::errors::ServerError;
use crate::health::{self, HealthResponse};
use crate::metrics::WS_CONNECTIONS_REJECTED_TOTAL;
use crate::shutdown::ShutdownCoordinator;
use crate::websocket::connection::ClientConnection;
use crate::websocket::dispatcher::{Dispatcher, Inbound};
use crate::websocket::registry::ConnectionRegistry;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Per-connection read loop and its collaborators.
    pub dispatcher: Dispatcher,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Prometheus render handle.
    pub metrics: PrometheusHandle,
    /// When the server started.
    pub start_time: Instant,
}

/// The chat relay.
pub struct RelayServer {
    config: Arc<ServerConfig>,
    dispatcher: Dispatcher,
    shutdown: Arc<ShutdownCoordinator>,
    metrics: PrometheusHandle,
    start_time: Instant,
}

impl RelayServer {
    /// Create a server with a fresh registry that assigns random names.
    pub fn new(
        config: ServerConfig,
        aggregator: RangeAggregator,
        command_log: Arc<dyn CommandLog>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self::with_registry(
            config,
            Arc::new(ConnectionRegistry::new()),
            aggregator,
            command_log,
            metrics,
        )
    }

    /// Create a server around an existing registry.
    pub fn with_registry(
        config: ServerConfig,
        registry: Arc<ConnectionRegistry>,
        aggregator: RangeAggregator,
        command_log: Arc<dyn CommandLog>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(registry, aggregator, command_log),
            shutdown: Arc::new(ShutdownCoordinator::new()),
            metrics,
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            dispatcher: self.dispatcher.clone(),
            shutdown: Arc::clone(&self.shutdown),
            config: Arc::clone(&self.config),
            metrics: self.metrics.clone(),
            start_time: self.start_time,
        };

        Router::new()
            .route("/ws", get(ws_handler))
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind the configured address and serve until shutdown.
    ///
    /// Returns the bound address (useful with port 0) and the serve task.
    pub async fn listen(&self) -> Result<(SocketAddr, JoinHandle<()>), ServerError> {
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let router = self.router();
        let token = self.shutdown.token();
        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await;
            if let Err(e) = result {
                error!(error = %e, "server terminated with error");
            }
        });

        info!(%local_addr, "ratechat relay listening");
        Ok((local_addr, handle))
    }

    /// The connection registry.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        self.dispatcher.registry()
    }

    /// The shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /ws
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let live = state.dispatcher.registry().connection_count();
    if live >= state.config.max_connections {
        warn!(live, max = state.config.max_connections, "rejecting connection");
        metrics::counter!(WS_CONNECTIONS_REJECTED_TOTAL).increment(1);
        return (StatusCode::SERVICE_UNAVAILABLE, "too many connections").into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Run one upgraded socket: a writer task drains the outbound queue while
/// the dispatcher consumes inbound frames until close or shutdown.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (conn, mut outbound) = ClientConnection::channel(state.config.outbound_queue);
    let (mut sink, stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sink.send(Message::Text(text.to_string().into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let inbound = stream
        .map(|msg| msg.map(inbound_event))
        .take_until(state.shutdown.token().cancelled_owned());

    state.dispatcher.run(conn, inbound).await;

    // The registry and dispatcher have released the connection, so the
    // queue closes and the writer flushes what is left.
    if let Err(e) = writer.await {
        warn!(error = %e, "writer task failed");
    }
}

fn inbound_event(msg: Message) -> Inbound {
    match msg {
        Message::Text(text) => Inbound::Text(text.as_str().to_owned()),
        Message::Close(_) => Inbound::Close,
        Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => Inbound::Ignored,
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let connections = state.dispatcher.registry().connection_count();
    Json(health::health_check(state.start_time, connections))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}
