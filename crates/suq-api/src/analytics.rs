use std::collections::BTreeMap;

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{error, warn};

use suq_types::api::{CategoryCount, Claims, OverviewResponse, TrendPoint};

use crate::auth::AppState;
use crate::parse_timestamp;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone, Copy)]
struct DayBucket {
    users: u64,
    products: u64,
    orders: u64,
}

/// Growth-trend series for the dashboard chart: one point per calendar day
/// in the inclusive range, each carrying cumulative counts of entities
/// created up to and including that day.
///
/// Creation dates outside the range are excluded outright, not clamped to
/// the boundary, so the cumulative totals count in-range creations only.
pub fn growth_trend(
    from: NaiveDate,
    to: NaiveDate,
    users: &[NaiveDate],
    products: &[NaiveDate],
    orders: &[NaiveDate],
) -> Vec<TrendPoint> {
    // Zero-filled bucket per day in range.
    let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    let mut day = from;
    while day <= to {
        days.insert(day, DayBucket::default());
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    // Tally per-day creations; lookups miss for out-of-range dates.
    for date in users {
        if let Some(bucket) = days.get_mut(date) {
            bucket.users += 1;
        }
    }
    for date in products {
        if let Some(bucket) = days.get_mut(date) {
            bucket.products += 1;
        }
    }
    for date in orders {
        if let Some(bucket) = days.get_mut(date) {
            bucket.orders += 1;
        }
    }

    // Prefix-sum in date order into running totals.
    let mut running = DayBucket::default();
    days.into_iter()
        .map(|(date, bucket)| {
            running.users += bucket.users;
            running.products += bucket.products;
            running.orders += bucket.orders;
            TrendPoint {
                date,
                users: running.users,
                products: running.products,
                orders: running.orders,
            }
        })
        .collect()
}

/// Trend endpoint. Defaults to the trailing 30 days, the dashboard's
/// initial range.
pub async fn trends(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let to = query.to.unwrap_or_else(|| Utc::now().date_naive());
    let from = query.from.unwrap_or(to - Duration::days(30));

    if from > to {
        warn!("Rejected trend range {} > {}", from, to);
        return Err(StatusCode::BAD_REQUEST);
    }

    let db = state.clone();
    let (users, products, orders) = tokio::task::spawn_blocking(move || {
        let users = db.db.user_creation_dates()?;
        let products = db.db.product_creation_dates()?;
        let orders = db.db.order_creation_dates()?;
        anyhow::Ok((users, products, orders))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .map_err(|e| { error!("Trend query failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let users: Vec<NaiveDate> = users
        .iter()
        .map(|raw| parse_timestamp(raw, "user").date_naive())
        .collect();
    let products: Vec<NaiveDate> = products
        .iter()
        .map(|raw| parse_timestamp(raw, "product").date_naive())
        .collect();
    let orders: Vec<NaiveDate> = orders
        .iter()
        .map(|raw| parse_timestamp(raw, "order").date_naive())
        .collect();

    Ok(Json(growth_trend(from, to, &users, &products, &orders)))
}

/// Headline numbers for the overview cards plus the category breakdown for
/// the pie chart.
pub async fn overview(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();

    let (stats, categories) = tokio::task::spawn_blocking(move || {
        let stats = db.db.overview()?;
        let categories = db.db.category_counts()?;
        anyhow::Ok((stats, categories))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .map_err(|e| { error!("Overview query failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    Ok(Json(OverviewResponse {
        total_revenue: stats.total_revenue,
        total_orders: stats.total_orders.max(0) as u64,
        total_products: stats.total_products.max(0) as u64,
        active_listers: stats.active_listers.max(0) as u64,
        new_users_this_month: stats.new_users_this_month.max(0) as u64,
        categories: categories
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category,
                count: count.max(0) as u64,
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn one_point_per_day_in_inclusive_range() {
        let points = growth_trend(d(2026, 8, 1), d(2026, 8, 10), &[], &[], &[]);
        assert_eq!(points.len(), 10);
        assert_eq!(points.first().unwrap().date, d(2026, 8, 1));
        assert_eq!(points.last().unwrap().date, d(2026, 8, 10));

        // Single-day range still yields one row.
        let single = growth_trend(d(2026, 8, 5), d(2026, 8, 5), &[], &[], &[]);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn totals_accumulate_and_never_decrease() {
        let users = vec![d(2026, 8, 2), d(2026, 8, 2), d(2026, 8, 7)];
        let products = vec![d(2026, 8, 1), d(2026, 8, 9)];
        let orders = vec![d(2026, 8, 5)];

        let points = growth_trend(d(2026, 8, 1), d(2026, 8, 10), &users, &products, &orders);

        assert!(points.windows(2).all(|w| {
            w[1].users >= w[0].users
                && w[1].products >= w[0].products
                && w[1].orders >= w[0].orders
        }));

        let last = points.last().unwrap();
        assert_eq!(last.users, 3);
        assert_eq!(last.products, 2);
        assert_eq!(last.orders, 1);

        // The two sign-ups on the 2nd land on that day's row.
        let second = &points[1];
        assert_eq!(second.date, d(2026, 8, 2));
        assert_eq!(second.users, 2);
        assert_eq!(second.orders, 0);
    }

    #[test]
    fn out_of_range_dates_are_excluded_not_clamped() {
        let users = vec![d(2026, 7, 31), d(2026, 8, 3), d(2026, 8, 11)];
        let points = growth_trend(d(2026, 8, 1), d(2026, 8, 10), &users, &[], &[]);

        // Only the in-range sign-up counts; neither neighbor is folded into
        // a boundary day.
        assert_eq!(points.first().unwrap().users, 0);
        assert_eq!(points.last().unwrap().users, 1);
    }

    #[test]
    fn empty_range_when_from_after_to() {
        let points = growth_trend(d(2026, 8, 10), d(2026, 8, 1), &[d(2026, 8, 5)], &[], &[]);
        assert!(points.is_empty());
    }
}
