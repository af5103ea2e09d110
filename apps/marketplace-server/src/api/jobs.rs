// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Job endpoints.
//!
//! Jobs are public: listing, reading and editing need no session. Bodies
//! are stored as sent, apart from the store-assigned `_id`.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    models::{self, fields, EmailQuery, Job, JobUpdate, NewJob},
    state::AppState,
    storage::{Collection, DeleteAck, Document, DocumentId, Filter, InsertAck, UpdateAck},
};

#[utoipa::path(
    post,
    path = "/jobs",
    request_body = NewJob,
    tag = "Jobs",
    responses(
        (status = 200, body = InsertAck),
        (status = 400, description = "Owner email missing")
    )
)]
pub async fn create_job(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<Json<InsertAck>, ApiError> {
    let job = models::new_job(body)?;
    let owner = job.get(fields::JOB_OWNER_EMAIL).cloned().unwrap_or_default();
    let ack = state.store.insert(Collection::Jobs, job)?;
    info!(job_id = %ack.inserted_id, owner = %owner, "Job posted");
    Ok(Json(ack))
}

#[utoipa::path(
    get,
    path = "/jobs",
    params(EmailQuery),
    tag = "Jobs",
    responses((status = 200, body = [Job]))
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = Filter::optional(fields::JOB_OWNER_EMAIL, query.email);
    Ok(Json(state.store.find(Collection::Jobs, &filter)?))
}

/// Fetch a single job. A missing job yields `null`.
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    params(("id" = String, Path, description = "Job identifier")),
    tag = "Jobs",
    responses(
        (status = 200, body = Option<Job>),
        (status = 400, description = "Malformed identifier")
    )
)]
pub async fn get_job(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Option<Document>>, ApiError> {
    let id: DocumentId = id.parse()?;
    Ok(Json(state.store.find_one(Collection::Jobs, &id)?))
}

/// Partially update a job, creating it when the id is unknown.
#[utoipa::path(
    patch,
    path = "/jobs/{id}",
    params(("id" = String, Path, description = "Job identifier")),
    request_body = JobUpdate,
    tag = "Jobs",
    responses(
        (status = 200, body = UpdateAck),
        (status = 400, description = "Malformed identifier")
    )
)]
pub async fn update_job(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<Json<UpdateAck>, ApiError> {
    let id: DocumentId = id.parse()?;
    let ack = state
        .store
        .update(Collection::Jobs, &id, models::job_changes(body), true)?;
    info!(
        job_id = %id,
        modified = ack.modified_count,
        upserted = ack.upserted_count,
        "Job updated"
    );
    Ok(Json(ack))
}

#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    params(("id" = String, Path, description = "Job identifier")),
    tag = "Jobs",
    responses(
        (status = 200, body = DeleteAck),
        (status = 400, description = "Malformed identifier")
    )
)]
pub async fn delete_job(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteAck>, ApiError> {
    let id: DocumentId = id.parse()?;
    let ack = state.store.delete(Collection::Jobs, &id)?;
    info!(job_id = %id, deleted = ack.deleted_count, "Job deleted");
    Ok(Json(ack))
}
