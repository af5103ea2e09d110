// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bid endpoints.
//!
//! Placing, reading and re-statusing a bid are public. The two listings are
//! mounted behind the session middleware and only ever return the caller's
//! own bids.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::{
    auth::{owner_filter, Auth, BidRole},
    error::ApiError,
    models::{self, fields, Bid, BidStatusUpdate, EmailQuery, NewBid},
    state::AppState,
    storage::{to_document, Collection, Document, DocumentId, Filter, InsertAck, UpdateAck},
};

#[utoipa::path(
    post,
    path = "/bids",
    request_body = NewBid,
    tag = "Bids",
    responses(
        (status = 200, body = InsertAck),
        (status = 400, description = "Bidder or buyer email missing")
    )
)]
pub async fn create_bid(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<Json<InsertAck>, ApiError> {
    let bid = models::new_bid(body)?;
    let bidder = bid.get(fields::BID_USER_EMAIL).cloned().unwrap_or_default();
    let buyer = bid.get(fields::BID_BUYER_EMAIL).cloned().unwrap_or_default();
    let ack = state.store.insert(Collection::Bids, bid)?;
    info!(
        bid_id = %ack.inserted_id,
        bidder = %bidder,
        buyer = %buyer,
        "Bid placed"
    );
    Ok(Json(ack))
}

fn load_bids(state: &AppState, filter: &Filter) -> Result<Vec<Document>, ApiError> {
    Ok(state.store.find(Collection::Bids, filter)?)
}

/// Bids placed by the caller.
#[utoipa::path(
    get,
    path = "/bids",
    params(EmailQuery),
    tag = "Bids",
    security(("session_cookie" = [])),
    responses(
        (status = 200, body = [Bid]),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Email is not the caller's")
    )
)]
pub async fn list_bidder_bids(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = owner_filter(&user, BidRole::Bidder, query.email.as_deref())?;
    Ok(Json(load_bids(&state, &filter)?))
}

/// Bids received on the caller's jobs.
#[utoipa::path(
    get,
    path = "/bids/buyerEmail",
    params(EmailQuery),
    tag = "Bids",
    security(("session_cookie" = [])),
    responses(
        (status = 200, body = [Bid]),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Email is not the caller's")
    )
)]
pub async fn list_buyer_bids(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = owner_filter(&user, BidRole::Buyer, query.email.as_deref())?;
    Ok(Json(load_bids(&state, &filter)?))
}

/// Fetch a single bid. A missing bid yields `null`.
#[utoipa::path(
    get,
    path = "/bids/{id}",
    params(("id" = String, Path, description = "Bid identifier")),
    tag = "Bids",
    responses(
        (status = 200, body = Option<Bid>),
        (status = 400, description = "Malformed identifier")
    )
)]
pub async fn get_bid(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Option<Document>>, ApiError> {
    let id: DocumentId = id.parse()?;
    Ok(Json(state.store.find_one(Collection::Bids, &id)?))
}

/// Set a bid's status. Unknown ids match nothing and create nothing.
#[utoipa::path(
    patch,
    path = "/bids/{id}",
    params(("id" = String, Path, description = "Bid identifier")),
    request_body = BidStatusUpdate,
    tag = "Bids",
    responses(
        (status = 200, body = UpdateAck),
        (status = 400, description = "Malformed identifier")
    )
)]
pub async fn update_bid_status(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(update): Json<BidStatusUpdate>,
) -> Result<Json<UpdateAck>, ApiError> {
    let id: DocumentId = id.parse()?;
    let ack = state
        .store
        .update(Collection::Bids, &id, to_document(&update)?, false)?;
    info!(bid_id = %id, status = %update.status, matched = ack.matched_count, "Bid status set");
    Ok(Json(ack))
}
