// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token codec.
//!
//! Tokens are HS256 JWTs signed with the server secret. They embed the
//! identity claim plus `iat`/`exp` and expire one hour after issuance.
//! Verification pins the algorithm and allows no clock leeway.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::claims::{AuthenticatedUser, IdentityClaim, SessionClaims};
use super::AuthError;

/// Lifetime of a session token in seconds.
pub const SESSION_TTL_SECS: i64 = 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies session tokens with a server-held secret.
pub struct SessionTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionTokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `claim`, valid for one hour from now.
    pub fn issue(&self, claim: &IdentityClaim) -> Result<String, AuthError> {
        self.issue_at(claim, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, claim: &IdentityClaim, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = SessionClaims {
            identity: claim.clone().without_reserved(),
            iat,
            exp: iat + SESSION_TTL_SECS,
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("failed to encode session token: {e}")))
    }

    /// Verify signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| AuthenticatedUser::from_claims(data.claims))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }
}

impl std::fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("secret", &"<redacted>")
            .finish()
    }
}
