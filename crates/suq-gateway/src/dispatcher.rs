use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::warn;

use suq_types::events::{Collection, ConversationKey, StoreEvent};

/// What one gateway connection has asked to receive.
///
/// A fresh connection receives nothing but `Ready` until it sends a
/// `Subscribe` command; each `Subscribe` replaces the previous set. When a
/// conversation key is present, message events are additionally narrowed to
/// that participant pair.
#[derive(Debug, Default, Clone)]
pub struct SubscriptionFilter {
    collections: HashSet<Collection>,
    conversation: Option<ConversationKey>,
}

impl SubscriptionFilter {
    pub fn set(&mut self, collections: HashSet<Collection>, conversation: Option<ConversationKey>) {
        self.collections = collections;
        self.conversation = conversation;
    }

    pub fn allows(&self, event: &StoreEvent) -> bool {
        // Connection-scoped events have no collection and always pass.
        let Some(collection) = event.collection() else {
            return true;
        };
        if !self.collections.contains(&collection) {
            return false;
        }
        if let (StoreEvent::MessageCreate { message }, Some(key)) = (event, &self.conversation) {
            return key.matches_message(message);
        }
        true
    }
}

/// Fans store events out to every live subscription.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    broadcast_tx: broadcast::Sender<StoreEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    /// Publish an event to all subscriptions. Send errors only mean nobody
    /// is listening right now.
    pub fn broadcast(&self, event: StoreEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Open a new subscription. It starts with an empty filter; dropping it
    /// is the only teardown required.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.inner.broadcast_tx.subscribe(),
            filter: Arc::new(RwLock::new(SubscriptionFilter::default())),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.broadcast_tx.receiver_count()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// One connection's live event stream.
pub struct Subscription {
    rx: broadcast::Receiver<StoreEvent>,
    filter: Arc<RwLock<SubscriptionFilter>>,
}

impl Subscription {
    /// Shared handle to this subscription's filter, so the command-reading
    /// side of a connection can retarget it while `recv` is pending.
    pub fn filter_handle(&self) -> Arc<RwLock<SubscriptionFilter>> {
        self.filter.clone()
    }

    /// Next event passing the filter, or `None` once the dispatcher is gone.
    pub async fn recv(&mut self) -> Option<StoreEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    // A poisoned filter ends the stream; the connection
                    // owning it is already going down.
                    let allowed = match self.filter.read() {
                        Ok(filter) => filter.allows(&event),
                        Err(e) => {
                            warn!("Subscription filter lock poisoned: {}", e);
                            return None;
                        }
                    };
                    if allowed {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Subscription lagged by {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use suq_types::models::Message;
    use uuid::Uuid;

    fn message_between(sender: Uuid, receiver: Uuid) -> Message {
        Message {
            id: Uuid::new_v4(),
            sender_id: sender,
            receiver_id: receiver,
            sender_email: String::new(),
            text: "hello".into(),
            image_url: None,
            created_at: Utc::now(),
        }
    }

    fn subscribe_to(
        dispatcher: &Dispatcher,
        collections: &[Collection],
        conversation: Option<ConversationKey>,
    ) -> Subscription {
        let sub = dispatcher.subscribe();
        sub.filter_handle()
            .write()
            .unwrap()
            .set(collections.iter().copied().collect(), conversation);
        sub
    }

    #[tokio::test]
    async fn delivers_only_subscribed_collections() {
        let dispatcher = Dispatcher::new();
        let mut sub = subscribe_to(&dispatcher, &[Collection::Orders], None);

        dispatcher.broadcast(StoreEvent::ProductDelete { id: Uuid::new_v4() });
        let order_id = Uuid::new_v4();
        dispatcher.broadcast(StoreEvent::OrderStatusUpdate {
            id: order_id,
            status: suq_types::models::OrderStatus::Delivered,
        });

        // The product event is filtered out; the order event arrives.
        match sub.recv().await {
            Some(StoreEvent::OrderStatusUpdate { id, .. }) => assert_eq!(id, order_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn ready_bypasses_the_filter() {
        let dispatcher = Dispatcher::new();
        let mut sub = dispatcher.subscribe(); // empty filter

        dispatcher.broadcast(StoreEvent::Ready {
            admin_id: Uuid::new_v4(),
            email: "admin@example.com".into(),
        });

        assert!(matches!(sub.recv().await, Some(StoreEvent::Ready { .. })));
    }

    #[tokio::test]
    async fn conversation_scope_narrows_message_events() {
        let dispatcher = Dispatcher::new();
        let admin = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let other = Uuid::new_v4();

        let key = ConversationKey::new(admin, peer);
        let mut sub = subscribe_to(&dispatcher, &[Collection::Messages], Some(key));

        dispatcher.broadcast(StoreEvent::MessageCreate {
            message: message_between(admin, other),
        });
        dispatcher.broadcast(StoreEvent::MessageCreate {
            message: message_between(peer, admin),
        });

        match sub.recv().await {
            Some(StoreEvent::MessageCreate { message }) => {
                assert_eq!(message.sender_id, peer);
                assert_eq!(message.receiver_id, admin);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn poisoned_filter_ends_the_stream_without_panicking() {
        let dispatcher = Dispatcher::new();
        let mut sub = dispatcher.subscribe();

        // Poison the filter lock by panicking while holding the write guard.
        let filter = sub.filter_handle();
        let _ = std::thread::spawn(move || {
            let _guard = filter.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        dispatcher.broadcast(StoreEvent::UserDelete { id: Uuid::new_v4() });
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropping_a_subscription_tears_it_down() {
        let dispatcher = Dispatcher::new();
        let sub = dispatcher.subscribe();
        assert_eq!(dispatcher.subscriber_count(), 1);

        drop(sub);
        assert_eq!(dispatcher.subscriber_count(), 0);

        // Broadcasting with no subscribers is not an error.
        dispatcher.broadcast(StoreEvent::UserDelete { id: Uuid::new_v4() });
    }
}
