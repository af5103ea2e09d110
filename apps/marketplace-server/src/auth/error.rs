// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Every unauthenticated variant maps to 401 with the same generic message;
/// the variant itself only shows up in logs and `error_code`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No session cookie on the request
    #[error("session cookie is missing")]
    MissingToken,
    /// Token is not a well-formed signed token
    #[error("token is malformed")]
    MalformedToken,
    /// Token signature does not match the server secret
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Token is past its expiration instant
    #[error("token has expired")]
    TokenExpired,
    /// Authenticated, but asking for someone else's records
    #[error("user {caller} cannot read records of {requested}")]
    Forbidden { caller: String, requested: String },
    /// Token could not be produced
    #[error("internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: &'static str,
    error_code: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::Forbidden { .. } => "forbidden",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to the client.
    pub fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "unauthorized access",
            StatusCode::FORBIDDEN => "forbidden access",
            _ => "internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            message: self.public_message(),
            error_code: self.error_code(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_token_returns_401() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["message"], "unauthorized access");
        assert_eq!(body["error_code"], "missing_token");
    }

    #[test]
    fn every_token_failure_is_unauthorized_with_generic_message() {
        for err in [
            AuthError::MissingToken,
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.public_message(), "unauthorized access");
        }
    }

    #[tokio::test]
    async fn forbidden_returns_403_without_leaking_emails() {
        let response = AuthError::Forbidden {
            caller: "a@x.com".into(),
            requested: "b@x.com".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"message":"forbidden access","error_code":"forbidden"}"#);
    }
}
