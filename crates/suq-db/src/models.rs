//! Database row types mapping directly to SQLite rows, kept distinct from
//! the suq-types API models so the DB layer stays independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub online: bool,
    pub listed_products: i64,
    pub created_at: String,
}

pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    /// JSON array of image URLs, stored verbatim.
    pub images: String,
    pub created_at: String,
}

pub struct OrderRow {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: String,
    pub payment_proof: Option<String>,
    pub total_amount: f64,
    pub status: String,
    pub created_at: String,
}

pub struct OrderItemRow {
    pub order_id: String,
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

pub struct MessageRow {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub sender_email: String,
    pub body: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

/// One chat sidebar entry: a peer and the latest message exchanged with them.
pub struct ConversationRow {
    pub peer_id: String,
    pub last_body: String,
    pub last_image_url: Option<String>,
    pub last_created_at: String,
}

/// Aggregate numbers for the dashboard overview cards.
pub struct OverviewRow {
    pub total_revenue: f64,
    pub total_orders: i64,
    pub total_products: i64,
    pub active_listers: i64,
    pub new_users_this_month: i64,
}
