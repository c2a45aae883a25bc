//! WebSocket client connection state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use ratechat_core::ConnectionId;
use tokio::sync::mpsc;

/// Handle to one connected client.
///
/// Holds the sending half of the connection's outbound queue; the writer
/// task owns the receiving half and drains it into the socket.
#[derive(Debug)]
pub struct ClientConnection {
    /// Unique connection ID.
    pub id: ConnectionId,
    tx: mpsc::Sender<Arc<str>>,
    connected_at: Instant,
    dropped_messages: AtomicU64,
}

impl ClientConnection {
    /// Wrap an existing sender.
    pub fn new(id: ConnectionId, tx: mpsc::Sender<Arc<str>>) -> Self {
        Self {
            id,
            tx,
            connected_at: Instant::now(),
            dropped_messages: AtomicU64::new(0),
        }
    }

    /// New connection with a fresh ID and an outbound queue of `capacity`.
    pub fn channel(capacity: usize) -> (Arc<Self>, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Arc::new(Self::new(ConnectionId::new(), tx)), rx)
    }

    /// Enqueue one text frame without waiting.
    ///
    /// Returns `false` if the queue is full or the writer has gone away;
    /// the drop counter is incremented in that case.
    pub fn send(&self, message: Arc<str>) -> bool {
        if self.tx.try_send(message).is_ok() {
            true
        } else {
            let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Enqueue a reply to this client's own request, waiting for room.
    ///
    /// Only the connection's own task should call this; it returns `false`
    /// once the writer has gone away.
    pub async fn send_reply(&self, message: Arc<str>) -> bool {
        if self.tx.send(message).await.is_ok() {
            true
        } else {
            let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Frames that could not be enqueued.
    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }

    /// Whether the writer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Connection age.
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_reaches_receiver() {
        let (conn, mut rx) = ClientConnection::channel(4);
        assert!(conn.send(Arc::from("hello")));
        assert_eq!(&*rx.recv().await.unwrap(), "hello");
        assert_eq!(conn.drop_count(), 0);
    }

    #[test]
    fn full_queue_drops_and_counts() {
        let (conn, _rx) = ClientConnection::channel(1);
        assert!(conn.send(Arc::from("one")));
        assert!(!conn.send(Arc::from("two")));
        assert_eq!(conn.drop_count(), 1);
    }

    #[test]
    fn closed_receiver_drops() {
        let (conn, rx) = ClientConnection::channel(4);
        drop(rx);
        assert!(conn.is_closed());
        assert!(!conn.send(Arc::from("gone")));
        assert_eq!(conn.drop_count(), 1);
    }

    #[tokio::test]
    async fn reply_waits_for_room() {
        let (conn, mut rx) = ClientConnection::channel(1);
        assert!(conn.send(Arc::from("queued")));

        let sender = Arc::clone(&conn);
        let reply = tokio::spawn(async move { sender.send_reply(Arc::from("reply")).await });

        assert_eq!(&*rx.recv().await.unwrap(), "queued");
        assert_eq!(&*rx.recv().await.unwrap(), "reply");
        assert!(reply.await.unwrap());
        assert_eq!(conn.drop_count(), 0);
    }

    #[tokio::test]
    async fn reply_to_closed_writer_fails() {
        let (conn, rx) = ClientConnection::channel(1);
        drop(rx);
        assert!(!conn.send_reply(Arc::from("gone")).await);
        assert_eq!(conn.drop_count(), 1);
    }

    #[test]
    fn ids_are_distinct() {
        let (a, _ra) = ClientConnection::channel(1);
        let (b, _rb) = ClientConnection::channel(1);
        assert_ne!(a.id, b.id);
        assert!(a.id.as_str().starts_with("conn_"));
    }
}
