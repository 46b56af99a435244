//! Presence registry
//!
//! Tracks which users hold a live notification stream. One connection per
//! user; a newer connection replaces the older one.

use dashmap::DashMap;
use mockall::automock;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use uuid::Uuid;

use crate::{auth::UserUuid, domain::notifications::models::Notification};

/// Sending half of a live notification stream.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    sender: UnboundedSender<Notification>,
}

impl ConnectionHandle {
    /// New handle plus the receiver the stream reads from.
    #[must_use]
    pub fn open() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = unbounded_channel();

        (
            Self {
                id: Uuid::now_v7(),
                sender,
            },
            receiver,
        )
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Push a notification. Returns `false` once the stream has gone away.
    pub fn deliver(&self, notification: Notification) -> bool {
        self.sender.send(notification).is_ok()
    }
}

#[automock]
pub trait PresenceRegistry: Send + Sync {
    /// Record `handle` as the user's live connection.
    fn register(&self, user: UserUuid, handle: ConnectionHandle);

    /// The user's live connection, if any.
    fn lookup(&self, user: UserUuid) -> Option<ConnectionHandle>;

    /// Forget the connection, unless a newer one has replaced it.
    fn unregister(&self, user: UserUuid, connection: Uuid);
}

#[derive(Debug, Default)]
pub struct InMemoryPresenceRegistry {
    connections: DashMap<UserUuid, ConnectionHandle>,
}

impl InMemoryPresenceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresenceRegistry for InMemoryPresenceRegistry {
    fn register(&self, user: UserUuid, handle: ConnectionHandle) {
        self.connections.insert(user, handle);
    }

    fn lookup(&self, user: UserUuid) -> Option<ConnectionHandle> {
        self.connections.get(&user).map(|entry| entry.value().clone())
    }

    fn unregister(&self, user: UserUuid, connection: Uuid) {
        self.connections
            .remove_if(&user, |_, handle| handle.id == connection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_connection_survives_stale_unregister() {
        let registry = InMemoryPresenceRegistry::new();
        let user = UserUuid::new();

        let (first, _first_rx) = ConnectionHandle::open();
        let (second, _second_rx) = ConnectionHandle::open();
        let first_id = first.id();
        let second_id = second.id();

        registry.register(user, first);
        registry.register(user, second);
        registry.unregister(user, first_id);

        assert_eq!(registry.lookup(user).map(|h| h.id()), Some(second_id));

        registry.unregister(user, second_id);

        assert!(registry.lookup(user).is_none());
    }

    #[test]
    fn delivery_fails_after_receiver_drops() {
        let (handle, receiver) = ConnectionHandle::open();

        drop(receiver);

        let notification = Notification {
            uuid: crate::domain::notifications::models::NotificationUuid::new(),
            user_uuid: UserUuid::new(),
            title: "t".to_owned(),
            body: "b".to_owned(),
            kind: crate::domain::notifications::models::NotificationKind::Promotion,
            order_uuid: None,
            created_at: jiff::Timestamp::UNIX_EPOCH,
            read_at: None,
        };

        assert!(!handle.deliver(notification));
    }
}
