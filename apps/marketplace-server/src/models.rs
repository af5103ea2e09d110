// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Jobs and bids are schemaless: posted bodies are stored as sent and read
//! back as stored. This module holds the few rules the API does enforce
//! (required owner fields, the default bid status, the editable job fields)
//! plus the typed shapes used to document the endpoints in OpenAPI.
//!
//! Field names are camelCase on the wire, matching the stored documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::storage::{Document, DocumentId};

/// Document field names the API reads or writes.
pub mod fields {
    /// Owner of a job.
    pub const JOB_OWNER_EMAIL: &str = "email";
    /// Bidder on a bid.
    pub const BID_USER_EMAIL: &str = "userEmail";
    /// Owner of the job a bid targets.
    pub const BID_BUYER_EMAIL: &str = "buyerEmail";
    /// Lifecycle status of a bid.
    pub const BID_STATUS: &str = "status";
    /// Job fields a partial update may set.
    pub const JOB_EDITABLE: [&str; 5] = [
        "jobTitle",
        "category",
        "minimumPrice",
        "maximumPrice",
        "description",
    ];
}

/// Status given to bids submitted without one.
pub const DEFAULT_BID_STATUS: &str = "pending";

// =============================================================================
// Body Rules
// =============================================================================

/// A posted body lacks a field the record cannot do without.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is required and must be a string")]
pub struct MissingField(pub &'static str);

fn require_strings(document: &Document, required: &[&'static str]) -> Result<(), MissingField> {
    match required
        .iter()
        .find(|field| !matches!(document.get(**field), Some(Value::String(_))))
    {
        Some(field) => Err(MissingField(*field)),
        None => Ok(()),
    }
}

/// Validate a posted job. Only the owner `email` is required; every other
/// field is kept as sent.
pub fn new_job(document: Document) -> Result<Document, MissingField> {
    require_strings(&document, &[fields::JOB_OWNER_EMAIL])?;
    Ok(document)
}

/// Validate a posted bid and fill in the default status.
pub fn new_bid(mut document: Document) -> Result<Document, MissingField> {
    require_strings(&document, &[fields::BID_USER_EMAIL, fields::BID_BUYER_EMAIL])?;
    if matches!(document.get(fields::BID_STATUS), None | Some(Value::Null)) {
        document.insert(
            fields::BID_STATUS.to_string(),
            Value::String(DEFAULT_BID_STATUS.to_string()),
        );
    }
    Ok(document)
}

/// Keep only the editable job fields of a partial update.
pub fn job_changes(mut document: Document) -> Document {
    document.retain(|field, _| fields::JOB_EDITABLE.contains(&field.as_str()));
    document
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Optional `email` query parameter shared by list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EmailQuery {
    /// Email to filter by.
    pub email: Option<String>,
}

// =============================================================================
// Job Models
// =============================================================================

/// Request to post a new job.
///
/// Only `email` is enforced; additional fields are stored as sent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub job_title: Option<String>,
    pub category: Option<String>,
    pub minimum_price: Option<f64>,
    pub maximum_price: Option<f64>,
    pub description: Option<String>,
    /// Email of the client posting the job.
    pub email: String,
}

/// Partial job update. Only the fields present are written; anything else,
/// including the owner `email`, is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub job_title: Option<String>,
    pub category: Option<String>,
    pub minimum_price: Option<f64>,
    pub maximum_price: Option<f64>,
    pub description: Option<String>,
}

/// A stored job.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub job_title: Option<String>,
    pub category: Option<String>,
    pub minimum_price: Option<f64>,
    pub maximum_price: Option<f64>,
    pub description: Option<String>,
    pub email: Option<String>,
}

// =============================================================================
// Bid Models
// =============================================================================

/// Request to place a bid on a job.
///
/// `status` defaults to `pending`; additional fields are stored as sent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBid {
    /// Title of the job being bid on.
    pub job_title: Option<String>,
    /// Offered price.
    pub price: Option<f64>,
    /// Proposed delivery date, as sent by the client.
    pub deadline: Option<String>,
    /// Email of the bidder.
    pub user_email: String,
    /// Email of the job owner.
    pub buyer_email: String,
    pub status: Option<String>,
}

/// Request to change a bid's status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BidStatusUpdate {
    pub status: String,
}

/// A stored bid.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub job_title: Option<String>,
    pub price: Option<f64>,
    pub deadline: Option<String>,
    pub user_email: Option<String>,
    pub buyer_email: Option<String>,
    pub status: Option<String>,
}
