// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! Persistent collections for jobs and bids, kept in a single embedded redb
//! file under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   marketplace.redb
//!     jobs   (id → job document)
//!     bids   (id → bid document)
//! ```
//!
//! The store knows nothing about users or sessions. Ownership filtering is
//! decided by the caller and expressed as a [`Filter`].

pub mod document;
pub mod document_db;

pub use document::{
    to_document, DeleteAck, Document, DocumentId, Filter, InsertAck,
    InvalidDocumentId, UpdateAck, ID_FIELD,
};
pub use document_db::{Collection, DocumentStore, StoreError, StoreResult};

/// File name of the database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "marketplace.redb";
