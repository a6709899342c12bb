use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use suq_db::models::ProductRow;
use suq_types::api::{Claims, ProductInput};
use suq_types::events::StoreEvent;
use suq_types::models::{Category, Product};

use crate::auth::AppState;
use crate::{format_timestamp, parse_timestamp, parse_uuid};

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<Category>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let search = query.search;
    let category = query.category;

    let rows = tokio::task::spawn_blocking(move || {
        db.db.list_products(search.as_deref(), category.map(|c| c.as_str()))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .map_err(|e| { error!("Product listing failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let products: Vec<Product> = rows.iter().filter_map(product_from_row).collect();
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let id = product_id.to_string();

    let row = tokio::task::spawn_blocking(move || db.db.get_product(&id))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("Product fetch failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let product = product_from_row(&row).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<ProductInput>,
) -> Result<impl IntoResponse, StatusCode> {
    validate(&req)?;

    let product_id = Uuid::new_v4();
    let now = Utc::now();
    let images_json =
        serde_json::to_string(&req.images).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let row = ProductRow {
        id: product_id.to_string(),
        name: req.name.clone(),
        price: req.price,
        category: req.category.as_str().to_string(),
        description: req.description.clone(),
        images: images_json,
        created_at: format_timestamp(&now),
    };

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.insert_product(&row))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("Product insert failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let product = Product {
        id: product_id,
        name: req.name,
        price: req.price,
        category: req.category,
        description: req.description,
        images: req.images,
        created_at: now,
    };

    info!("Listed product {} ({})", product.name, product_id);
    state.dispatcher.broadcast(StoreEvent::ProductCreate { product: product.clone() });

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<ProductInput>,
) -> Result<impl IntoResponse, StatusCode> {
    validate(&req)?;

    let images_json =
        serde_json::to_string(&req.images).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let row = ProductRow {
        id: product_id.to_string(),
        name: req.name,
        price: req.price,
        category: req.category.as_str().to_string(),
        description: req.description,
        images: images_json,
        // Ignored by the update; created_at is preserved in the store.
        created_at: String::new(),
    };

    let db = state.clone();
    let updated = tokio::task::spawn_blocking(move || {
        if db.db.update_product(&row)? {
            db.db.get_product(&row.id)
        } else {
            Ok(None)
        }
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .map_err(|e| { error!("Product update failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .ok_or(StatusCode::NOT_FOUND)?;

    let product = product_from_row(&updated).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    info!("Updated product {}", product_id);
    state.dispatcher.broadcast(StoreEvent::ProductUpdate { product: product.clone() });

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let id = product_id.to_string();

    let deleted = tokio::task::spawn_blocking(move || db.db.delete_product(&id))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("Product delete failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }

    info!("Deleted product {}", product_id);
    state.dispatcher.broadcast(StoreEvent::ProductDelete { id: product_id });

    Ok(StatusCode::NO_CONTENT)
}

/// Same rules as the storefront's listing form: name and a positive price
/// are required.
fn validate(req: &ProductInput) -> Result<(), StatusCode> {
    if req.name.trim().is_empty() {
        warn!("Rejected product payload: empty name");
        return Err(StatusCode::BAD_REQUEST);
    }
    if !req.price.is_finite() || req.price <= 0.0 {
        warn!("Rejected product payload: bad price {}", req.price);
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(())
}

fn product_from_row(row: &ProductRow) -> Option<Product> {
    let category = match row.category.parse::<Category>() {
        Ok(category) => category,
        Err(e) => {
            warn!("Skipping product '{}': {}", row.id, e);
            return None;
        }
    };

    let images = serde_json::from_str::<Vec<String>>(&row.images).unwrap_or_else(|e| {
        warn!("Corrupt images on product '{}': {}", row.id, e);
        Vec::new()
    });

    Some(Product {
        id: parse_uuid(&row.id, "product"),
        name: row.name.clone(),
        price: row.price,
        category,
        description: row.description.clone(),
        images,
        created_at: parse_timestamp(&row.created_at, "product"),
    })
}
