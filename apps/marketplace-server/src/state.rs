// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{SessionCookiePolicy, SessionTokenCodec};
use crate::storage::DocumentStore;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub sessions: Arc<SessionTokenCodec>,
    pub cookies: SessionCookiePolicy,
}

impl AppState {
    pub fn new(
        store: DocumentStore,
        sessions: SessionTokenCodec,
        cookies: SessionCookiePolicy,
    ) -> Self {
        Self {
            store: Arc::new(store),
            sessions: Arc::new(sessions),
            cookies,
        }
    }
}

/// State over a throwaway database, for tests.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = DocumentStore::open(&dir.path().join("test.redb")).expect("Failed to open store");
    let state = AppState::new(
        store,
        SessionTokenCodec::new(b"test_secret_key_for_testing_purposes_only"),
        SessionCookiePolicy::default(),
    );
    (state, dir)
}
