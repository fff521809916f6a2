//! Session registry: live connections and their metadata.

use std::collections::HashMap;

use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::common::time::now_millis;
use crate::protocol::{DEFAULT_LANG, DEFAULT_NAME};

/// Server-generated identity of one accepted connection.
pub type ConnectionId = Uuid;

/// Connection state held by the registry.
pub struct ClientInfo {
    /// Outbound channel feeding this client's socket writer task.
    pub sender: mpsc::UnboundedSender<String>,
    /// Display name, default "Anon" until a join event arrives.
    pub name: String,
    /// Language preference, default "en".
    pub lang: String,
    /// Unix timestamp when connected (milliseconds).
    pub connected_at: i64,
}

/// Point-in-time view of one connection, handed to the router for
/// fan-out. Owns everything a per-recipient task needs, so deliveries
/// never reach back into the registry mid-iteration.
#[derive(Clone)]
pub struct Recipient {
    pub id: ConnectionId,
    pub lang: String,
    pub sender: mpsc::UnboundedSender<String>,
}

/// Tracks live connections and each connection's display name and
/// language preference. One map keeps membership and metadata
/// consistent by construction.
#[derive(Default)]
pub struct SessionRegistry {
    clients: Mutex<HashMap<ConnectionId, ClientInfo>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection after transport-level accept. Metadata starts at
    /// the defaults and is enriched by a later join event, if any.
    pub async fn register(&self, id: ConnectionId, sender: mpsc::UnboundedSender<String>) {
        let mut clients = self.clients.lock().await;
        clients.insert(
            id,
            ClientInfo {
                sender,
                name: DEFAULT_NAME.to_string(),
                lang: DEFAULT_LANG.to_string(),
                connected_at: now_millis(),
            },
        );
        tracing::debug!("Client '{}' registered", id);
    }

    /// Idempotent metadata upsert for a join event. Language codes are
    /// not validated against any whitelist. A no-op when the connection
    /// has already gone away.
    pub async fn set_metadata(&self, id: ConnectionId, name: &str, lang: &str) {
        let mut clients = self.clients.lock().await;
        if let Some(info) = clients.get_mut(&id) {
            info.name = name.to_string();
            info.lang = lang.to_string();
        } else {
            tracing::debug!("Ignoring metadata for unknown client '{}'", id);
        }
    }

    /// Remove a connection. Safe to call any number of times; disconnect
    /// and send-error paths may both attempt removal.
    pub async fn unregister(&self, id: ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(&id).is_some() {
            tracing::debug!("Client '{}' unregistered", id);
        }
    }

    /// Current recipient list. The router takes one snapshot per inbound
    /// event so that concurrent disconnects cannot disturb an in-flight
    /// fan-out; connections joining mid-event are missed for that event.
    pub async fn snapshot(&self) -> Vec<Recipient> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .map(|(id, info)| Recipient {
                id: *id,
                lang: info.lang.clone(),
                sender: info.sender.clone(),
            })
            .collect()
    }

    /// Display name and language of a sender, with defaults when the
    /// connection is unknown or never joined.
    pub async fn sender_meta(&self, id: ConnectionId) -> (String, String) {
        let clients = self.clients.lock().await;
        match clients.get(&id) {
            Some(info) => (info.name.clone(), info.lang.clone()),
            None => (DEFAULT_NAME.to_string(), DEFAULT_LANG.to_string()),
        }
    }

    /// Number of live connections.
    pub async fn count(&self) -> usize {
        self.clients.lock().await.len()
    }
}
