use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use suq_db::models::UserRow;
use suq_types::api::Claims;
use suq_types::events::StoreEvent;
use suq_types::models::User;

use crate::auth::AppState;
use crate::{parse_timestamp, parse_uuid};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
}

/// Storefront account directory, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let search = query.search;

    let rows = tokio::task::spawn_blocking(move || db.db.list_users(search.as_deref()))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("User listing failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let users: Vec<User> = rows.iter().map(user_from_row).collect();
    Ok(Json(users))
}

/// Remove a storefront account. Messages and orders that reference the user
/// keep their embedded data; nothing cascades.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let id = user_id.to_string();

    let deleted = tokio::task::spawn_blocking(move || db.db.delete_user(&id))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("User delete failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }

    info!("Deleted user {}", user_id);
    state.dispatcher.broadcast(StoreEvent::UserDelete { id: user_id });

    Ok(StatusCode::NO_CONTENT)
}

fn user_from_row(row: &UserRow) -> User {
    User {
        id: parse_uuid(&row.id, "user"),
        username: row.username.clone(),
        email: row.email.clone(),
        profile_image: row.profile_image.clone(),
        online: row.online,
        listed_products: row.listed_products.max(0) as u32,
        created_at: parse_timestamp(&row.created_at, "user"),
    }
}
