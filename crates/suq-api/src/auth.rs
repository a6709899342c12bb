use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};
use uuid::Uuid;

use suq_db::Database;
use suq_gateway::dispatcher::Dispatcher;
use suq_types::api::{Claims, LoginRequest, LoginResponse};

use crate::media::MediaStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub dispatcher: Dispatcher,
    pub media: MediaStore,
    pub config: AdminConfig,
}

/// Admin identity and server secrets, loaded once at startup. The original
/// console hard-coded the admin credential inside the login screen; here it
/// is explicit configuration carried by state into every handler.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub admin_id: Uuid,
    pub admin_email: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub public_url: String,
}

/// Single-account login: the submitted credential is compared against the
/// configured admin identity, and a signed bearer token is issued on match.
/// There is no user registration on this surface.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let config = &state.config;

    if req.email != config.admin_email || req.password != config.admin_password {
        warn!("Rejected login attempt for {}", req.email);
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = create_token(&config.jwt_secret, config.admin_id, &config.admin_email)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    info!("Admin {} logged in", config.admin_email);

    Ok(Json(LoginResponse {
        admin_id: config.admin_id,
        email: config.admin_email.clone(),
        token,
    }))
}

fn create_token(secret: &str, admin_id: Uuid, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: admin_id,
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
