use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Category, OrderStatus};

// -- JWT Claims --

/// JWT claims shared between suq-api (REST middleware) and suq-gateway
/// (WebSocket authentication). Canonical definition lives here in suq-types
/// to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub admin_id: Uuid,
    pub email: String,
    pub token: String,
}

// -- Products --

/// Body for both product create and update. Validation mirrors the
/// storefront form: name required, price strictly positive.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

// -- Orders --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetOrderStatusRequest {
    pub status: OrderStatus,
}

// -- Messages --

/// One chat sidebar entry: the peer plus a preview of the latest message.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub peer_id: Uuid,
    pub last_text: String,
    pub last_image_url: Option<String>,
    pub last_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub text: String,
    pub image_url: Option<String>,
}

// -- Media --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadRequest {
    /// Base64-encoded file bytes.
    pub data: String,
    pub content_type: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

// -- Analytics --

/// One row of the growth-trend chart: cumulative entity counts as of `date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub users: u64,
    pub products: u64,
    pub orders: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub total_products: u64,
    pub active_listers: u64,
    pub new_users_this_month: u64,
    pub categories: Vec<CategoryCount>,
}
