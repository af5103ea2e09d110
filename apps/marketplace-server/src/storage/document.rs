// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Schemaless documents, identifiers, filters and write acknowledgements.
//!
//! Documents are plain JSON objects. The store owns the `_id` field: it is
//! assigned on insert and can never be rewritten by an update.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{StoreError, StoreResult};

/// Name of the store-managed identifier field.
pub const ID_FIELD: &str = "_id";

/// A stored JSON object.
pub type Document = Map<String, Value>;

// =============================================================================
// Identifiers
// =============================================================================

/// Store-assigned document identifier.
///
/// Generated as UUIDv7, so the lexicographic key order inside a collection
/// follows insertion order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Key used for the redb tables.
    pub fn key(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Rejected client-supplied identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid document identifier: {0}")]
pub struct InvalidDocumentId(pub String);

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidDocumentId(s.to_string()))
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Query filter for [`find`](super::DocumentStore::find).
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection.
    All,
    /// Documents whose top-level `field` equals `value`.
    FieldEquals { field: &'static str, value: Value },
}

impl Filter {
    pub fn field_equals(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::FieldEquals {
            field,
            value: value.into(),
        }
    }

    /// `All` when the value is absent, `FieldEquals` otherwise.
    pub fn optional(field: &'static str, value: Option<String>) -> Self {
        match value {
            Some(value) => Self::field_equals(field, value),
            None => Filter::All,
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::FieldEquals { field, value } => document.get(*field) == Some(value),
        }
    }
}

// =============================================================================
// Acknowledgements
// =============================================================================

/// Result of an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

/// Result of an update (with or without upsert).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<DocumentId>,
}

impl UpdateAck {
    pub(super) fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub(super) fn upserted(id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        }
    }

    pub(super) fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

/// Result of a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

// =============================================================================
// Conversions
// =============================================================================

/// Serialize a typed value into a document. The value must serialize to a
/// JSON object.
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::NotAnObject(json_kind(&other))),
    }
}

/// Copy `changes` onto `document`, skipping the identifier.
///
/// Returns whether any field actually changed.
pub(super) fn apply_changes(document: &mut Document, changes: Document) -> bool {
    let mut modified = false;
    for (field, value) in changes {
        if field == ID_FIELD {
            continue;
        }
        if document.get(&field) != Some(&value) {
            document.insert(field, value);
            modified = true;
        }
    }
    modified
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
