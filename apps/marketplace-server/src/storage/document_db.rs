// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `jobs`: document id → serialized job document (JSON bytes)
//! - `bids`: document id → serialized bid document (JSON bytes)
//!
//! Every operation runs in its own redb transaction, so single-document
//! writes are atomic and concurrent writers are serialized by redb.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::Value;

use super::document::{
    apply_changes, DeleteAck, Document, DocumentId, Filter, InsertAck, UpdateAck, ID_FIELD,
};

// =============================================================================
// Table Definitions
// =============================================================================

const JOBS: TableDefinition<&str, &[u8]> = TableDefinition::new("jobs");

const BIDS: TableDefinition<&str, &[u8]> = TableDefinition::new("bids");

/// Named collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Jobs,
    Bids,
}

impl Collection {
    fn table(self) -> TableDefinition<'static, &'static str, &'static [u8]> {
        match self {
            Collection::Jobs => JOBS,
            Collection::Bids => BIDS,
        }
    }
}

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("document must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// DocumentStore
// =============================================================================

/// Persistent collection store for jobs and bids.
///
/// Opened once at startup and shared through `AppState`; the database file
/// is closed when the last handle is dropped.
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(JOBS)?;
            let _ = write_txn.open_table(BIDS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a new document under a freshly generated id.
    ///
    /// Any `_id` supplied by the caller is replaced.
    pub fn insert(&self, collection: Collection, mut document: Document) -> StoreResult<InsertAck> {
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        let json = serde_json::to_vec(&document)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(collection.table())?;
            table.insert(id.key().as_str(), json.as_slice())?;
        }
        write_txn.commit()?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    /// All documents matching `filter`, in insertion order.
    pub fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection.table())?;

        let mut documents = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            let document: Document = serde_json::from_slice(entry.1.value())?;
            if filter.matches(&document) {
                documents.push(document);
            }
        }

        Ok(documents)
    }

    /// Look up a single document by id.
    pub fn find_one(&self, collection: Collection, id: &DocumentId) -> StoreResult<Option<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection.table())?;
        let document = match table.get(id.key().as_str())? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(document)
    }

    /// Set the fields in `changes` on the document with the given id.
    ///
    /// With `upsert`, a missing document is created carrying `id` and the
    /// supplied fields.
    pub fn update(
        &self,
        collection: Collection,
        id: &DocumentId,
        changes: Document,
        upsert: bool,
    ) -> StoreResult<UpdateAck> {
        let key = id.key();

        let write_txn = self.db.begin_write()?;
        let ack = {
            let mut table = write_txn.open_table(collection.table())?;
            let existing = table.get(key.as_str())?.map(|value| value.value().to_vec());

            match existing {
                Some(bytes) => {
                    let mut document: Document = serde_json::from_slice(&bytes)?;
                    let modified = apply_changes(&mut document, changes);
                    if modified {
                        let json = serde_json::to_vec(&document)?;
                        table.insert(key.as_str(), json.as_slice())?;
                    }
                    UpdateAck::matched(modified)
                }
                None if upsert => {
                    let mut document = Document::new();
                    document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                    apply_changes(&mut document, changes);
                    let json = serde_json::to_vec(&document)?;
                    table.insert(key.as_str(), json.as_slice())?;
                    UpdateAck::upserted(*id)
                }
                None => UpdateAck::unmatched(),
            }
        };
        write_txn.commit()?;

        Ok(ack)
    }

    /// Remove the document with the given id, if present.
    pub fn delete(&self, collection: Collection, id: &DocumentId) -> StoreResult<DeleteAck> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(collection.table())?;
            let removed = table.remove(id.key().as_str())?.is_some();
            removed
        };
        write_txn.commit()?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: u64::from(removed),
        })
    }

    /// Readiness check: open a read transaction on every table.
    pub fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(JOBS)?;
        read_txn.open_table(BIDS)?;
        Ok(())
    }
}
