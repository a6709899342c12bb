use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use suq_db::models::{OrderItemRow, OrderRow};
use suq_types::api::{Claims, SetOrderStatusRequest};
use suq_types::events::StoreEvent;
use suq_types::models::{Customer, Order, OrderItem, OrderStatus};

use crate::auth::AppState;
use crate::{parse_timestamp, parse_uuid};

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

/// Order history, newest first, capped at the store's 100-row query limit.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let search = query.search;
    let status = query.status;

    let (rows, item_rows) = tokio::task::spawn_blocking(move || {
        let rows = db
            .db
            .list_orders(search.as_deref(), status.map(|s| s.as_str()))?;
        let order_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let item_rows = db.db.get_items_for_orders(&order_ids)?;
        anyhow::Ok((rows, item_rows))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .map_err(|e| { error!("Order listing failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    // Group line items by order id (cheap in-memory work, fine on the async thread)
    let mut items_by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
    for item in &item_rows {
        items_by_order
            .entry(item.order_id.clone())
            .or_default()
            .push(item_from_row(item));
    }

    let orders: Vec<Order> = rows
        .into_iter()
        .map(|row| {
            let items = items_by_order.remove(&row.id).unwrap_or_default();
            order_from_row(row, items)
        })
        .collect();

    Ok(Json(orders))
}

/// Set an order's status. Writing the current status again succeeds without
/// changing anything; only a missing order fails.
pub async fn set_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<SetOrderStatusRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let id = order_id.to_string();
    let status = req.status;

    let found = tokio::task::spawn_blocking(move || db.db.set_order_status(&id, status.as_str()))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("Order status update failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    if !found {
        return Err(StatusCode::NOT_FOUND);
    }

    info!("Order {} status set to {}", order_id, status);
    state
        .dispatcher
        .broadcast(StoreEvent::OrderStatusUpdate { id: order_id, status });

    Ok(StatusCode::NO_CONTENT)
}

fn item_from_row(row: &OrderItemRow) -> OrderItem {
    OrderItem {
        product_id: parse_uuid(&row.product_id, "order item"),
        name: row.name.clone(),
        quantity: row.quantity.max(0) as u32,
        price: row.price,
    }
}

fn order_from_row(row: OrderRow, items: Vec<OrderItem>) -> Order {
    // Unknown statuses degrade to Review, the state every new order starts in.
    let status = row.status.parse::<OrderStatus>().unwrap_or_else(|e| {
        warn!("Order '{}': {}, treating as Review", row.id, e);
        OrderStatus::Review
    });

    Order {
        id: parse_uuid(&row.id, "order"),
        customer: Customer {
            full_name: row.customer_name,
            email: row.customer_email,
            phone: row.customer_phone,
            address: row.customer_address,
            city: row.customer_city,
            payment_proof: row.payment_proof,
        },
        items,
        total_amount: row.total_amount,
        status,
        created_at: parse_timestamp(&row.created_at, "order"),
    }
}
