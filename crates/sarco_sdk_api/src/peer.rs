//! Peer transport events and logging.

use crate::sarco_core::traits::*;
use crate::*;
use parking_lot::Mutex;
use std::sync::Arc;

/// Peer ids are logged truncated to this many trailing characters on
/// connect / disconnect.
pub const ID_TRUNCATE_LIMIT: usize = 5;

/// A peer lifecycle event, carrying the peer id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// Connection established.
    Connect(Arc<str>),

    /// Connection dropped.
    Disconnect(Arc<str>),

    /// Peer discovered.
    Discovery(Arc<str>),
}

impl PeerEvent {
    /// The log line for this event.
    pub fn log_message(&self) -> String {
        match self {
            Self::Connect(id) => {
                format!("Connection established to {}", truncate_peer_id(id))
            }
            Self::Disconnect(id) => {
                format!("Connection dropped from {}", truncate_peer_id(id))
            }
            Self::Discovery(id) => format!("Discovered {id}"),
        }
    }
}

/// Handler invoked for each peer event.
pub type PeerEventHandler = Arc<dyn Fn(PeerEvent) + 'static + Send + Sync>;

/// The last [`ID_TRUNCATE_LIMIT`] characters of a peer id.
pub fn truncate_peer_id(id: &str) -> &str {
    let count = id.chars().count();
    if count <= ID_TRUNCATE_LIMIT {
        return id;
    }
    match id.char_indices().nth(count - ID_TRUNCATE_LIMIT) {
        Some((idx, _)) => &id[idx..],
        None => id,
    }
}

/// Log every connect / disconnect / discovery event of this transport.
pub fn log_peer_events(transport: &PeerTransport) {
    transport.register_peer_event_handler(Arc::new(|event: PeerEvent| {
        tracing::info!("{}", event.log_message());
    }));
}

/// In-memory peer transport - usually for testing.
#[derive(Clone, Default)]
pub struct MemPeerTransport(Arc<Mutex<Vec<PeerEventHandler>>>);

impl MemPeerTransport {
    /// Create a transport with no handlers registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle over this transport.
    pub fn as_transport(&self) -> PeerTransport {
        PeerTransport(Arc::new(self.clone()))
    }

    /// Deliver an event to every registered handler.
    pub fn emit(&self, event: PeerEvent) {
        let handlers = self.0.lock().clone();
        for handler in handlers {
            handler(event.clone());
        }
    }
}

impl AsPeerTransport for MemPeerTransport {
    fn register_peer_event_handler(&self, handler: PeerEventHandler) {
        self.0.lock().push(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncation() {
        assert_eq!("WxYz9", truncate_peer_id("12D3KooWAbCdWxYz9"));
        assert_eq!("abc", truncate_peer_id("abc"));
        assert_eq!("", truncate_peer_id(""));
        assert_eq!("öäüßé", truncate_peer_id("aöäüßé"));
    }

    #[test]
    fn messages() {
        let id: Arc<str> = "12D3KooWAbCdWxYz9".into();
        assert_eq!(
            "Connection established to WxYz9",
            PeerEvent::Connect(id.clone()).log_message()
        );
        assert_eq!(
            "Connection dropped from WxYz9",
            PeerEvent::Disconnect(id.clone()).log_message()
        );
        assert_eq!(
            "Discovered 12D3KooWAbCdWxYz9",
            PeerEvent::Discovery(id).log_message()
        );
    }

    #[test]
    fn handlers_receive_events() {
        let mem = MemPeerTransport::new();
        let transport = mem.as_transport();
        log_peer_events(&transport);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        transport.register_peer_event_handler(Arc::new(move |e: PeerEvent| {
            seen2.lock().push(e);
        }));

        mem.emit(PeerEvent::Discovery("a".into()));
        mem.emit(PeerEvent::Connect("a".into()));

        assert_eq!(
            vec![
                PeerEvent::Discovery("a".into()),
                PeerEvent::Connect("a".into()),
            ],
            *seen.lock()
        );
    }
}
