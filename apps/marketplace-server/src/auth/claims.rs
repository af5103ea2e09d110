// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and the authenticated user representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Claim names owned by the token codec. A client cannot set them.
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Identity supplied by the client when asking for a session.
///
/// This is exactly what gets embedded in the token; nothing is looked up
/// or persisted on the server. Only `email` is required, every other field
/// is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityClaim {
    /// Email of the user the session is issued for.
    pub email: String,
    /// Any further fields posted at issuance.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdentityClaim {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }

    /// Drop client-supplied `iat`/`exp` so the codec alone decides them.
    pub fn without_reserved(mut self) -> Self {
        for name in RESERVED_CLAIMS {
            self.extra.remove(name);
        }
        self
    }
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub identity: IdentityClaim,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated user information extracted from a verified token.
///
/// The request authenticator stores this in request extensions; handlers
/// read it back through the `Auth` extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The identity claim exactly as issued.
    pub identity: IdentityClaim,
    /// Token issue time (Unix timestamp)
    pub issued_at: i64,
    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            identity: claims.identity,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }
}
