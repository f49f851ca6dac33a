//! Request handlers
//!
//! All read paths serve the current snapshot and always answer; the only
//! client-visible failures are 404 on exact-match misses and 400 on admin
//! validation. Refresh failures never reach these handlers — the snapshot
//! they read is the last good one.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::Utc;
use log::warn;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::http::response::{bad_request, created, not_found, ok};
use crate::services::{Aggregator, AppContext};
use crate::types::{IpoListing, IpoStatus, TrackerError};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// `GET /api/ipos?status=` — all listings, optional status equality
/// filter. Unrecognized or absent status returns everything.
pub async fn list_ipos(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<ListQuery>,
) -> Response {
    let filter = params
        .status
        .as_deref()
        .and_then(IpoStatus::parse_filter);
    let data = ctx.state.snapshot().listings(filter);
    ok(json!({
        "success": true,
        "count": data.len(),
        "data": data,
        "timestamp": Utc::now(),
    }))
}

/// `GET /api/ipos/{symbol}` — exact match or 404.
pub async fn get_ipo(
    State(ctx): State<Arc<AppContext>>,
    Path(symbol): Path<String>,
) -> Response {
    let snapshot = ctx.state.snapshot();
    match snapshot.by_symbol(&symbol) {
        Some(ipo) => ok(json!({ "success": true, "data": ipo })),
        None => not_found("IPO not found"),
    }
}

/// `GET /api/gmp` — per-listing premium projections.
pub async fn gmp(State(ctx): State<Arc<AppContext>>) -> Response {
    let data = ctx.state.snapshot().gmp_views();
    ok(json!({
        "success": true,
        "count": data.len(),
        "data": data,
        "timestamp": Utc::now(),
    }))
}

/// `GET /api/gmp/trending` — top merged records by premium.
pub async fn gmp_trending(State(ctx): State<Arc<AppContext>>) -> Response {
    let snapshot = ctx.state.snapshot();
    let data = Aggregator::trending(&snapshot.gmp);
    ok(json!({
        "success": true,
        "count": data.len(),
        "data": data,
        "timestamp": Utc::now(),
    }))
}

/// `GET /api/gmp/{identifier}` — one merged record, exact match or 404.
pub async fn gmp_by_identifier(
    State(ctx): State<Arc<AppContext>>,
    Path(identifier): Path<String>,
) -> Response {
    let snapshot = ctx.state.snapshot();
    match Aggregator::lookup(&snapshot.gmp, &identifier) {
        Some(record) => ok(json!({ "success": true, "data": record, "timestamp": Utc::now() })),
        None => not_found("IPO not found"),
    }
}

/// `GET /api/subscriptions` — demand multiples per listing.
pub async fn subscriptions(State(ctx): State<Arc<AppContext>>) -> Response {
    let snapshot = ctx.state.snapshot();
    let data: Vec<_> = snapshot
        .ipos
        .iter()
        .map(|ipo| {
            json!({
                "companyName": ipo.company_name,
                "symbol": ipo.symbol,
                "subscriptionRatio": ipo.subscription,
                "status": ipo.status,
            })
        })
        .collect();
    ok(json!({
        "success": true,
        "count": data.len(),
        "data": data,
        "timestamp": Utc::now(),
    }))
}

/// `GET /api/stats` — aggregate counts and rounded averages.
pub async fn stats(State(ctx): State<Arc<AppContext>>) -> Response {
    let snapshot = ctx.state.snapshot();
    let last_updated = snapshot.refreshed_at.unwrap_or_else(Utc::now);
    let data = Aggregator::stats(&snapshot.ipos, last_updated);
    ok(json!({ "success": true, "data": data }))
}

/// `GET /api/search?q=` — case-sensitive substring search.
pub async fn search(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.q.unwrap_or_default();
    let results = ctx.state.snapshot().search(&query);
    ok(json!({
        "success": true,
        "ipos": results.ipos,
        "mainboard": results.mainboard,
        "sme": results.sme,
    }))
}

/// `POST /api/admin/ipo` — create or replace a listing.
///
/// Validation failures surface as 400; a store write failure degrades to
/// in-memory only so the listing is still served.
pub async fn create_ipo(
    State(ctx): State<Arc<AppContext>>,
    axum::Json(listing): axum::Json<IpoListing>,
) -> Response {
    match ctx.store.insert_listing(&listing) {
        Ok(()) => {}
        Err(TrackerError::Validation(message)) => return bad_request(&message),
        Err(e) => warn!("store write failed, keeping listing in memory: {e}"),
    }
    ctx.state.upsert_listing(listing.clone());
    created(json!({ "success": true, "data": listing }))
}

/// `GET /api/health` — liveness plus whether any data is loaded.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Response {
    let snapshot = ctx.state.snapshot();
    ok(json!({
        "status": "ok",
        "message": "ipotrack is running",
        "dataLoaded": !snapshot.is_empty(),
        "lastDataFetch": snapshot.refreshed_at,
    }))
}
