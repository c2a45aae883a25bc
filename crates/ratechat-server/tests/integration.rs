//! End-to-end tests using a real WebSocket client.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use metrics_exporter_prometheus::PrometheusBuilder;
use ratechat_core::FetchError;
use ratechat_core::constants::MAX_DAYS_MESSAGE;
use ratechat_logging::{CommandLog, MemoryCommandLog};
use ratechat_rates::{RangeAggregator, RateSource};
use ratechat_server::config::ServerConfig;
use ratechat_server::server::RelayServer;
use ratechat_server::websocket::names::NameSource;
use ratechat_server::websocket::registry::ConnectionRegistry;
use serde_json::{Value, json};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

const TIMEOUT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(300);

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// "Guest 1", "Guest 2", ... in registration order.
#[derive(Default)]
struct GuestNames(AtomicUsize);

impl NameSource for GuestNames {
    fn full_name(&self) -> String {
        format!("Guest {}", self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Answers every date with EUR and USD; counts calls.
#[derive(Default)]
struct FixedRates {
    calls: AtomicUsize,
}

#[async_trait]
impl RateSource for FixedRates {
    async fn fetch(&self, _date: &str) -> Result<Value, FetchError> {
        let _ = self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(json!({"exchangeRate": [
            {"baseCurrency": "UAH", "currency": "USD", "saleRateNB": 41.5, "purchaseRateNB": 41.2},
            {"baseCurrency": "UAH", "currency": "EUR", "saleRateNB": 45.1, "purchaseRateNB": 44.9}
        ]}))
    }
}

struct TestRelay {
    url: String,
    server: RelayServer,
    rates: Arc<FixedRates>,
    log: Arc<MemoryCommandLog>,
}

async fn boot(config: ServerConfig) -> TestRelay {
    let rates = Arc::new(FixedRates::default());
    let log = Arc::new(MemoryCommandLog::new());
    let server = RelayServer::with_registry(
        config,
        Arc::new(ConnectionRegistry::with_names(GuestNames::default())),
        RangeAggregator::new(Arc::clone(&rates) as Arc<dyn RateSource>),
        Arc::clone(&log) as Arc<dyn CommandLog>,
        PrometheusBuilder::new().build_recorder().handle(),
    );
    let (addr, _handle) = server.listen().await.unwrap();
    TestRelay {
        url: format!("ws://{addr}/ws"),
        server,
        rates,
        log,
    }
}

impl TestRelay {
    /// Connect and wait until the registry has `expected` connections.
    async fn connect(&self, expected: usize) -> WsStream {
        let (ws, _) = timeout(TIMEOUT, connect_async(self.url.as_str()))
            .await
            .unwrap()
            .unwrap();
        self.wait_for_count(expected).await;
        ws
    }

    async fn wait_for_count(&self, expected: usize) {
        timeout(TIMEOUT, async {
            while self.server.registry().connection_count() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }
}

async fn send(ws: &mut WsStream, text: &str) {
    ws.send(Message::text(text.to_string())).await.unwrap();
}

async fn recv_text(ws: &mut WsStream) -> String {
    loop {
        let msg = timeout(TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("read failed");
        if let Message::Text(text) = msg {
            return text.as_str().to_owned();
        }
    }
}

async fn assert_silent(ws: &mut WsStream) {
    let next = timeout(QUIET, ws.next()).await;
    assert!(next.is_err(), "unexpected frame: {next:?}");
}

// ── broadcast ──

#[tokio::test]
async fn chat_reaches_others_but_not_sender() {
    let relay = boot(ServerConfig::default()).await;
    let mut a = relay.connect(1).await;
    let mut b = relay.connect(2).await;

    send(&mut a, "hi").await;

    assert_eq!(recv_text(&mut b).await, "Guest 1: hi");
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn messages_from_one_sender_keep_order() {
    let relay = boot(ServerConfig::default()).await;
    let mut a = relay.connect(1).await;
    let mut b = relay.connect(2).await;

    for i in 0..20 {
        send(&mut a, &format!("m{i}")).await;
    }
    for i in 0..20 {
        assert_eq!(recv_text(&mut b).await, format!("Guest 1: m{i}"));
    }
}

#[tokio::test]
async fn three_clients_fan_out() {
    let relay = boot(ServerConfig::default()).await;
    let mut a = relay.connect(1).await;
    let mut b = relay.connect(2).await;
    let mut c = relay.connect(3).await;

    send(&mut b, "from b").await;

    assert_eq!(recv_text(&mut a).await, "Guest 2: from b");
    assert_eq!(recv_text(&mut c).await, "Guest 2: from b");
    assert_silent(&mut b).await;
}

// ── exchange ──

#[tokio::test]
async fn over_ceiling_reply_goes_to_requester_only() {
    let relay = boot(ServerConfig::default()).await;
    let mut a = relay.connect(1).await;
    let mut b = relay.connect(2).await;

    send(&mut a, "exchange 11").await;

    assert_eq!(recv_text(&mut a).await, MAX_DAYS_MESSAGE);
    assert_silent(&mut b).await;
    assert_eq!(relay.rates.calls.load(Ordering::Relaxed), 0);
    assert_eq!(relay.log.lines().len(), 1);
}

#[tokio::test]
async fn exchange_returns_json_to_requester_only() {
    let relay = boot(ServerConfig::default()).await;
    let mut a = relay.connect(1).await;
    let mut b = relay.connect(2).await;

    send(&mut a, "exchange 3 GBP").await;

    let reply: Value = serde_json::from_str(&recv_text(&mut a).await).unwrap();
    let days = reply.as_array().unwrap();
    assert_eq!(days.len(), 3);
    for day in days {
        let (date, rates) = day.as_object().unwrap().iter().next().unwrap();
        assert_eq!(date.len(), "DD.MM.YYYY".len());
        assert_eq!(rates["EUR"]["sale"], 45.1);
        assert_eq!(rates["USD"]["purchase"], 41.2);
        assert!(rates.get("GBP").is_none());
    }
    assert_silent(&mut b).await;
    assert_eq!(relay.rates.calls.load(Ordering::Relaxed), 3);

    let lines = relay.log.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("Exchange command executed: exchange 3 GBP"));
}

#[tokio::test]
async fn connection_survives_rejected_exchange() {
    let relay = boot(ServerConfig::default()).await;
    let mut a = relay.connect(1).await;
    let mut b = relay.connect(2).await;

    send(&mut a, "exchange 99999999999999999999").await;
    assert_eq!(recv_text(&mut a).await, MAX_DAYS_MESSAGE);

    send(&mut a, "still here").await;
    assert_eq!(recv_text(&mut b).await, "Guest 1: still here");
}

// ── lifecycle ──

#[tokio::test]
async fn disconnect_unregisters() {
    let relay = boot(ServerConfig::default()).await;
    let mut a = relay.connect(1).await;
    let _b = relay.connect(2).await;

    a.close(None).await.unwrap();
    relay.wait_for_count(1).await;
}

#[tokio::test]
async fn dropped_client_is_unregistered() {
    let relay = boot(ServerConfig::default()).await;
    let a = relay.connect(1).await;
    drop(a);
    relay.wait_for_count(0).await;
}

#[tokio::test]
async fn connection_cap_rejects_upgrade() {
    let config = ServerConfig {
        max_connections: 1,
        ..ServerConfig::default()
    };
    let relay = boot(config).await;
    let _a = relay.connect(1).await;

    let second = timeout(TIMEOUT, connect_async(relay.url.as_str())).await.unwrap();
    assert!(second.is_err());
    assert_eq!(relay.server.registry().connection_count(), 1);
}

#[tokio::test]
async fn shutdown_closes_open_connections() {
    let relay = boot(ServerConfig::default()).await;
    let mut a = relay.connect(1).await;

    relay.server.shutdown().shutdown();
    relay.wait_for_count(0).await;

    // The socket ends with a close frame or EOF.
    let end = timeout(TIMEOUT, async {
        while let Some(Ok(msg)) = a.next().await {
            if msg.is_close() {
                break;
            }
        }
    })
    .await;
    assert!(end.is_ok());
}

#[tokio::test]
async fn health_reports_live_connections() {
    let relay = boot(ServerConfig::default()).await;
    let _a = relay.connect(1).await;

    let health_url = relay.url.replace("ws://", "http://").replace("/ws", "/health");
    let body: Value = reqwest::get(&health_url)
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 1);
}
