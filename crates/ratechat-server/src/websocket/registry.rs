//! Live connection set and chat fan-out.
//!
//! Every operation takes the single lock once and never awaits while holding
//! it. Broadcast enqueues with `try_send` under the read lock, so a slow or
//! dead recipient costs one failed enqueue and never blocks the others, and
//! one sender's messages reach each recipient in the order they were issued.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use ratechat_core::ConnectionId;
use tracing::{debug, warn};

use super::connection::ClientConnection;
use super::names::{NameSource, RandomNames};
use crate::metrics::{WS_BROADCAST_DROPS_TOTAL, WS_CONNECTIONS_ACTIVE};

struct Entry {
    conn: Arc<ClientConnection>,
    identity: Arc<str>,
}

/// Outcome of one broadcast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients whose queue accepted the frame.
    pub delivered: usize,
    /// Recipients whose queue was full or closed.
    pub failed: usize,
}

/// Registered connections and their display identities.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Entry>>,
    names: Box<dyn NameSource>,
}

impl ConnectionRegistry {
    /// Registry that assigns random display names.
    pub fn new() -> Self {
        Self::with_names(RandomNames)
    }

    /// Registry that draws display names from `names`.
    pub fn with_names(names: impl NameSource + 'static) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            names: Box::new(names),
        }
    }

    /// Add `conn` to the live set and return its identity.
    ///
    /// Re-registering an ID that is already present replaces the handle but
    /// keeps the identity.
    pub fn register(&self, conn: Arc<ClientConnection>) -> Arc<str> {
        let mut conns = self.connections.write();
        if let Some(entry) = conns.get_mut(&conn.id) {
            entry.conn = conn;
            return Arc::clone(&entry.identity);
        }

        let identity: Arc<str> = unique_identity(&conns, self.names.full_name()).into();
        let id = conn.id.clone();
        let _ = conns.insert(
            id,
            Entry {
                conn,
                identity: Arc::clone(&identity),
            },
        );
        #[allow(clippy::cast_precision_loss)]
        metrics::gauge!(WS_CONNECTIONS_ACTIVE).set(conns.len() as f64);
        identity
    }

    /// Remove `id`. Returns whether it was present.
    pub fn unregister(&self, id: &ConnectionId) -> bool {
        let mut conns = self.connections.write();
        let removed = conns.remove(id).is_some();
        if removed {
            #[allow(clippy::cast_precision_loss)]
            metrics::gauge!(WS_CONNECTIONS_ACTIVE).set(conns.len() as f64);
        }
        removed
    }

    /// Send `"<identity>: <text>"` to every registered connection except
    /// the sender.
    ///
    /// A sender that is not registered broadcasts nothing.
    pub fn broadcast(&self, sender: &ConnectionId, text: &str) -> BroadcastReport {
        let conns = self.connections.read();
        let Some(origin) = conns.get(sender) else {
            warn!(conn_id = %sender, "broadcast from unregistered connection");
            return BroadcastReport::default();
        };
        let frame: Arc<str> = format!("{}: {text}", origin.identity).into();

        let mut report = BroadcastReport::default();
        for (id, entry) in conns.iter() {
            if id == sender {
                continue;
            }
            if entry.conn.send(Arc::clone(&frame)) {
                report.delivered += 1;
            } else {
                report.failed += 1;
                warn!(conn_id = %id, "failed to enqueue broadcast");
            }
        }
        drop(conns);

        if report.failed > 0 {
            metrics::counter!(WS_BROADCAST_DROPS_TOTAL).increment(report.failed as u64);
        }
        debug!(
            conn_id = %sender,
            delivered = report.delivered,
            failed = report.failed,
            "broadcast"
        );
        report
    }

    /// Send `text` to one connection. Returns `false` if it is not
    /// registered or its queue rejected the frame.
    pub fn send_to(&self, id: &ConnectionId, text: &str) -> bool {
        let conns = self.connections.read();
        conns
            .get(id)
            .is_some_and(|entry| entry.conn.send(Arc::from(text)))
    }

    /// Number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    /// Identity assigned to `id`, if registered.
    pub fn identity_of(&self, id: &ConnectionId) -> Option<Arc<str>> {
        self.connections
            .read()
            .get(id)
            .map(|entry| Arc::clone(&entry.identity))
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.read().contains_key(id)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn unique_identity(conns: &HashMap<ConnectionId, Entry>, base: String) -> String {
    let taken = |name: &str| conns.values().any(|e| &*e.identity == name);
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base} {n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
