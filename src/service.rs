// service.rs
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::error::ChatError;
use crate::message::Message;
use crate::presence::PresenceTracker;
use crate::protocol::ServerEvent;
use crate::store::MessageStore;

/// Identifies one registered push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientId(u64);

struct PushClient {
    id: ClientId,
    username: String,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

struct Inner {
    store: MessageStore,
    presence: PresenceTracker,
    clients: Vec<PushClient>,
    next_client_id: u64,
}

/// The shared synchronization core. Both transports go through this handle;
/// one mutex serializes every mutation, and broadcasts are sent only after
/// the lock is released. Senders are unbounded channels, so a slow socket
/// never stalls the critical section or other clients.
#[derive(Clone)]
pub struct ChatService {
    inner: Arc<Mutex<Inner>>,
    exclude_self: bool,
}

impl ChatService {
    pub fn new(presence_ttl: Duration, exclude_self: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                store: MessageStore::new(),
                presence: PresenceTracker::new(presence_ttl),
                clients: Vec::new(),
                next_client_id: 0,
            })),
            exclude_self,
        }
    }

    /// Appends a message and fans it out to every push client. The sender's
    /// presence is refreshed as well, since posting proves liveness.
    pub fn post_message(&self, username: &str, content: &str) -> Result<Message, ChatError> {
        let (message, recipients) = {
            let mut inner = self.inner.lock().unwrap();
            let message = inner.store.append(username, content)?;
            inner.presence.touch(username, Instant::now());
            (message, inner.senders())
        };

        log::debug!("message {} from {} stored", message.id, message.username);
        broadcast(recipients, ServerEvent::Message { data: message.clone() });
        Ok(message)
    }

    /// Snapshot of the full log, insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.inner.lock().unwrap().store.list().to_vec()
    }

    /// Empties the log and tells every push client to drop its local copy.
    pub fn clear_messages(&self) {
        let (dropped, recipients) = {
            let mut inner = self.inner.lock().unwrap();
            let dropped = inner.store.len();
            inner.store.clear();
            (dropped, inner.senders())
        };

        log::info!("message log cleared ({dropped} messages dropped)");
        broadcast(recipients, ServerEvent::Clear);
    }

    /// Poll-mode heartbeat: refreshes presence for `username` and returns the
    /// active set. Whether the caller sees itself is a deployment choice.
    pub fn poll_active_users(&self, username: &str) -> Vec<String> {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();
        inner.presence.touch(username, now);
        let exclude = self.exclude_self.then_some(username);
        inner.presence.active_users(now, exclude)
    }

    /// Registers a push connection after its `join` frame and broadcasts the
    /// updated user list (the joiner included) to every connection.
    pub fn join(&self, username: &str, sender: mpsc::UnboundedSender<ServerEvent>) -> ClientId {
        let now = Instant::now();
        let (id, users, recipients) = {
            let mut inner = self.inner.lock().unwrap();
            inner.next_client_id += 1;
            let id = ClientId(inner.next_client_id);
            inner.clients.push(PushClient {
                id,
                username: username.to_string(),
                sender,
            });
            inner.presence.connect(username, now);
            (id, inner.presence.active_users(now, None), inner.senders())
        };

        log::info!("{} joined ({} online)", username, users.len());
        broadcast(recipients, ServerEvent::Users { data: users });
        id
    }

    /// Deregisters a push connection and rebroadcasts the user list. Runs on
    /// graceful leave and abrupt close alike; idempotent per connection.
    pub fn leave(&self, id: ClientId) {
        let now = Instant::now();
        let departed = {
            let mut inner = self.inner.lock().unwrap();
            let pos = inner.clients.iter().position(|c| c.id == id);
            let Some(pos) = pos else { return };
            let client = inner.clients.remove(pos);
            inner.presence.disconnect(&client.username, now);
            let users = inner.presence.active_users(now, None);
            (client.username, users, inner.senders())
        };

        let (username, users, recipients) = departed;
        log::info!("{} left ({} online)", username, users.len());
        broadcast(recipients, ServerEvent::Users { data: users });
    }
}

impl Inner {
    fn senders(&self) -> Vec<mpsc::UnboundedSender<ServerEvent>> {
        self.clients.iter().map(|c| c.sender.clone()).collect()
    }
}

/// Fire-and-forget fan-out. A closed receiver just means that connection is
/// on its way out; its cleanup path handles deregistration.
fn broadcast(recipients: Vec<mpsc::UnboundedSender<ServerEvent>>, event: ServerEvent) {
    for sender in recipients {
        sender.send(event.clone()).ok();
    }
}
