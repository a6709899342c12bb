use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{error, warn};
use uuid::Uuid;

use suq_db::models::MessageRow;
use suq_types::api::{Claims, ConversationSummary, SendMessageRequest};
use suq_types::events::StoreEvent;
use suq_types::models::Message;

use crate::auth::AppState;
use crate::{format_timestamp, parse_timestamp, parse_uuid};

/// Chat sidebar: one entry per peer the admin has exchanged messages with,
/// most recently active first.
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let admin = claims.sub.to_string();

    let rows = tokio::task::spawn_blocking(move || db.db.list_conversations(&admin))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("Conversation listing failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let summaries: Vec<ConversationSummary> = rows
        .iter()
        .map(|row| ConversationSummary {
            peer_id: parse_uuid(&row.peer_id, "conversation"),
            last_text: row.last_body.clone(),
            last_image_url: row.last_image_url.clone(),
            last_at: parse_timestamp(&row.last_created_at, "conversation"),
        })
        .collect();
    Ok(Json(summaries))
}

/// Everything exchanged between the signed-in admin and one storefront user,
/// in creation order. The pair predicate runs inside the store query; there
/// is no fetch-everything-and-filter pass and no pagination.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(peer_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let admin = claims.sub.to_string();
    let peer = peer_id.to_string();

    let rows = tokio::task::spawn_blocking(move || db.db.get_conversation(&admin, &peer))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("Conversation fetch failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let messages: Vec<Message> = rows.iter().map(message_from_row).collect();
    Ok(Json(messages))
}

/// Send a message to a storefront user. Messages are immutable once stored;
/// a message needs text, an image, or both.
pub async fn send_message(
    State(state): State<AppState>,
    Path(peer_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let text = req.text.trim().to_string();
    if text.is_empty() && req.image_url.is_none() {
        warn!("Rejected empty message to {}", peer_id);
        return Err(StatusCode::BAD_REQUEST);
    }

    let message_id = Uuid::new_v4();
    let now = Utc::now();

    let row = MessageRow {
        id: message_id.to_string(),
        sender_id: claims.sub.to_string(),
        receiver_id: peer_id.to_string(),
        sender_email: claims.email.clone(),
        body: text.clone(),
        image_url: req.image_url.clone(),
        created_at: format_timestamp(&now),
    };

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.insert_message(&row))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("Message insert failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let message = Message {
        id: message_id,
        sender_id: claims.sub,
        receiver_id: peer_id,
        sender_email: claims.email,
        text,
        image_url: req.image_url,
        created_at: now,
    };

    state.dispatcher.broadcast(StoreEvent::MessageCreate { message: message.clone() });

    Ok((StatusCode::CREATED, Json(message)))
}

fn message_from_row(row: &MessageRow) -> Message {
    Message {
        id: parse_uuid(&row.id, "message"),
        sender_id: parse_uuid(&row.sender_id, "message"),
        receiver_id: parse_uuid(&row.receiver_id, "message"),
        sender_email: row.sender_email.clone(),
        text: row.body.clone(),
        image_url: row.image_url.clone(),
        created_at: parse_timestamp(&row.created_at, "message"),
    }
}
