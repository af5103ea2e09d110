// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session issuance and logout.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{auth::IdentityClaim, error::ApiError, state::AppState};

/// Body returned by the session endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SessionAck {
    pub success: bool,
}

/// Sign the posted identity and set it as the `token` cookie.
///
/// The identity is not checked against anything: whoever posts an email
/// receives a session for it.
#[utoipa::path(
    post,
    path = "/jwt",
    request_body = IdentityClaim,
    tag = "Session",
    responses(
        (status = 200, description = "Session cookie set", body = SessionAck),
        (status = 500, description = "Token could not be signed")
    )
)]
pub async fn issue_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(identity): Json<IdentityClaim>,
) -> Result<(CookieJar, Json<SessionAck>), ApiError> {
    let token = state.sessions.issue(&identity)?;
    info!(email = %identity.email, "Session issued");
    Ok((
        jar.add(state.cookies.session_cookie(token)),
        Json(SessionAck { success: true }),
    ))
}

/// Clear the session cookie. Needs no session.
///
/// Outstanding tokens stay valid until they expire. Any request body is
/// only logged.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Session",
    responses((status = 200, description = "Session cookie cleared", body = SessionAck))
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: String,
) -> (CookieJar, Json<SessionAck>) {
    if body.is_empty() {
        info!("Session cookie cleared");
    } else {
        info!(body = %body, "Session cookie cleared");
    }
    (
        jar.add(state.cookies.removal_cookie()),
        Json(SessionAck { success: true }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SESSION_COOKIE;
    use crate::state::test_state;

    #[tokio::test]
    async fn issued_cookie_verifies_to_posted_email() {
        let (state, _dir) = test_state();
        let (jar, Json(ack)) = issue_session(
            State(state.clone()),
            CookieJar::new(),
            Json(IdentityClaim::new("a@x.com")),
        )
        .await
        .unwrap();
        assert!(ack.success);

        let cookie = jar.get(SESSION_COOKIE).expect("cookie set");
        assert_eq!(cookie.http_only(), Some(true));
        let user = state.sessions.verify(cookie.value()).unwrap();
        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.expires_at - user.issued_at, crate::auth::SESSION_TTL_SECS);
    }

    #[tokio::test]
    async fn issued_cookie_carries_extra_identity_fields() {
        let (state, _dir) = test_state();
        let identity: IdentityClaim = serde_json::from_value(serde_json::json!({
            "email": "a@x.com",
            "displayName": "Alice",
            "exp": 9_999_999_999u64
        }))
        .unwrap();
        let (jar, _ack) = issue_session(State(state.clone()), CookieJar::new(), Json(identity))
            .await
            .unwrap();

        let cookie = jar.get(SESSION_COOKIE).expect("cookie set");
        let user = state.sessions.verify(cookie.value()).unwrap();
        assert_eq!(user.identity.extra["displayName"], "Alice");
        assert!(!user.identity.extra.contains_key("exp"));
        assert_eq!(user.expires_at - user.issued_at, crate::auth::SESSION_TTL_SECS);
    }

    #[tokio::test]
    async fn logout_accepts_any_body() {
        let (state, _dir) = test_state();
        let body = r#"{"email":"a@x.com"}"#.to_string();
        let (jar, Json(ack)) = logout(State(state), CookieJar::new(), body).await;
        assert!(ack.success);
        assert!(jar.get(SESSION_COOKIE).is_some());
    }

    #[tokio::test]
    async fn logout_sets_expired_empty_cookie() {
        let (state, _dir) = test_state();
        let (jar, Json(ack)) = logout(State(state), CookieJar::new(), String::new()).await;
        assert!(ack.success);

        let cookie = jar.get(SESSION_COOKIE).expect("removal cookie set");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age().map(|age| age.whole_seconds()), Some(0));
    }
}
