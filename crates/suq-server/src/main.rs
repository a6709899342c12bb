use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State, WebSocketUpgrade},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use suq_api::auth::{self, AdminConfig, AppState, AppStateInner};
use suq_api::media::MediaStore;
use suq_api::middleware::require_auth;
use suq_api::{analytics, conversations, media, orders, products, users};
use suq_gateway::connection;
use suq_gateway::dispatcher::Dispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "suq=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("SUQ_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("SUQ_DB_PATH").unwrap_or_else(|_| "suq.db".into());
    let host = std::env::var("SUQ_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SUQ_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let media_dir = std::env::var("SUQ_MEDIA_DIR").unwrap_or_else(|_| "media".into());
    let public_url = std::env::var("SUQ_PUBLIC_URL")
        .unwrap_or_else(|_| format!("http://localhost:{port}"));
    let admin_id: Uuid = std::env::var("SUQ_ADMIN_ID")
        .unwrap_or_else(|_| "00000000-0000-0000-0000-000000000001".into())
        .parse()?;
    let admin_email =
        std::env::var("SUQ_ADMIN_EMAIL").unwrap_or_else(|_| "admin@suq.local".into());
    let admin_password =
        std::env::var("SUQ_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me".into());

    // Init stores
    let db = suq_db::Database::open(&PathBuf::from(&db_path))?;
    let media_store = MediaStore::new(PathBuf::from(&media_dir)).await?;
    let media_root = media_store.dir().to_path_buf();

    // Shared state
    let dispatcher = Dispatcher::new();
    let state: AppState = Arc::new(AppStateInner {
        db,
        dispatcher,
        media: media_store,
        config: AdminConfig {
            admin_id,
            admin_email,
            admin_password,
            jwt_secret,
            public_url,
        },
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{user_id}", delete(users::delete_user))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{product_id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/orders", get(orders::list_orders))
        .route("/orders/{order_id}/status", put(orders::set_order_status))
        .route("/conversations", get(conversations::list_conversations))
        .route(
            "/conversations/{peer_id}/messages",
            get(conversations::get_messages).post(conversations::send_message),
        )
        .route("/analytics/trends", get(analytics::trends))
        .route("/analytics/overview", get(analytics::overview))
        .route(
            "/uploads",
            post(media::upload).layer(DefaultBodyLimit::max(media::MAX_UPLOAD_BODY_BYTES)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    let ws_route = Router::new()
        .route("/gateway", get(ws_upgrade))
        .with_state(state.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(ws_route)
        .nest_service("/media", ServeDir::new(media_root))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Suq admin server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let dispatcher = state.dispatcher.clone();
    let jwt_secret = state.config.jwt_secret.clone();
    ws.on_upgrade(move |socket| connection::handle_connection(socket, dispatcher, jwt_secret))
}
