use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Message, OrderStatus, Product};

/// Store collections a gateway client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    Products,
    Orders,
    Messages,
}

/// Events pushed over the WebSocket gateway whenever a store write succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StoreEvent {
    /// Server confirms successful authentication
    Ready { admin_id: Uuid, email: String },

    /// A chat message was sent
    MessageCreate { message: Message },

    /// A product was listed
    ProductCreate { product: Product },

    /// A product was edited
    ProductUpdate { product: Product },

    /// A product was removed from the listing
    ProductDelete { id: Uuid },

    /// An order moved to a new status
    OrderStatusUpdate { id: Uuid, status: OrderStatus },

    /// A storefront account was deleted
    UserDelete { id: Uuid },
}

impl StoreEvent {
    /// Returns the collection this event belongs to. `Ready` is
    /// connection-scoped and has no collection; it is always delivered.
    pub fn collection(&self) -> Option<Collection> {
        match self {
            Self::Ready { .. } => None,
            Self::MessageCreate { .. } => Some(Collection::Messages),
            Self::ProductCreate { .. }
            | Self::ProductUpdate { .. }
            | Self::ProductDelete { .. } => Some(Collection::Products),
            Self::OrderStatusUpdate { .. } => Some(Collection::Orders),
            Self::UserDelete { .. } => Some(Collection::Users),
        }
    }
}

/// Commands sent FROM client TO server over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayCommand {
    /// Authenticate the WebSocket connection
    Identify { token: String },

    /// Replace this connection's subscription set. Only events for the named
    /// collections are delivered; message events are additionally narrowed to
    /// the given conversation peer when one is set.
    Subscribe {
        collections: Vec<Collection>,
        #[serde(default)]
        conversation: Option<Uuid>,
    },
}

/// Unordered participant pair identifying one admin<->user conversation.
///
/// A message belongs to the conversation when {sender, receiver} equals
/// {a, b} exactly. Both directions match; a message between either
/// participant and any third party does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    a: Uuid,
    b: Uuid,
}

impl ConversationKey {
    pub fn new(x: Uuid, y: Uuid) -> Self {
        if x <= y { Self { a: x, b: y } } else { Self { a: y, b: x } }
    }

    pub fn matches(&self, sender: Uuid, receiver: Uuid) -> bool {
        (sender == self.a && receiver == self.b) || (sender == self.b && receiver == self.a)
    }

    pub fn matches_message(&self, message: &Message) -> bool {
        self.matches(message.sender_id, message.receiver_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn msg(n: u32, sender: Uuid, receiver: Uuid) -> Message {
        Message {
            id: Uuid::new_v4(),
            sender_id: sender,
            receiver_id: receiver,
            sender_email: String::new(),
            text: format!("m{n}"),
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, n).unwrap(),
        }
    }

    #[test]
    fn conversation_matches_both_directions_only() {
        let admin = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let key = ConversationKey::new(admin, peer);

        assert!(key.matches(admin, peer));
        assert!(key.matches(peer, admin));
        assert!(!key.matches(admin, other));
        assert!(!key.matches(other, peer));
        // A participant messaging themselves is not part of the pair.
        assert!(!key.matches(admin, admin));
    }

    #[test]
    fn filters_three_matching_out_of_eight_in_order() {
        let admin = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let key = ConversationKey::new(admin, peer);

        // 5 unrelated, 3 matching, already in ascending creation order.
        let messages = vec![
            msg(0, admin, other),
            msg(1, peer, admin),
            msg(2, other, stranger),
            msg(3, admin, peer),
            msg(4, stranger, admin),
            msg(5, other, peer),
            msg(6, admin, peer),
            msg(7, peer, other),
        ];

        let conversation: Vec<&Message> = messages
            .iter()
            .filter(|m| key.matches_message(m))
            .collect();

        assert_eq!(conversation.len(), 3);
        let texts: Vec<&str> = conversation.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m1", "m3", "m6"]);
        assert!(conversation.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn ready_is_global_and_writes_are_collection_scoped() {
        let ready = StoreEvent::Ready { admin_id: Uuid::new_v4(), email: "a@b.c".into() };
        assert_eq!(ready.collection(), None);

        let deleted = StoreEvent::UserDelete { id: Uuid::new_v4() };
        assert_eq!(deleted.collection(), Some(Collection::Users));
    }
}
