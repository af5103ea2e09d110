// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authenticator middleware.
//!
//! Guards protected routes: the `token` cookie must be present and verify
//! under the server secret, otherwise the request is answered with 401 and
//! never reaches the handler. On success the [`AuthenticatedUser`] is stored
//! in request extensions.
//!
//! ```rust,ignore
//! let session = axum::middleware::from_fn_with_state(state.clone(), require_session);
//! Router::new().route("/bids", get(list_bidder_bids).route_layer(session));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::{cookie::SESSION_COOKIE, token::SessionTokenCodec, AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&jar, &state.sessions) {
        Ok(user) => {
            debug!(
                user = %user.email(),
                method = %request.method(),
                path = %request.uri().path(),
                "Session verified"
            );
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            warn!(
                reason = %e,
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected unauthenticated request"
            );
            e.into_response()
        }
    }
}

/// Read the session cookie from `jar` and verify it.
pub fn authenticate(
    jar: &CookieJar,
    sessions: &SessionTokenCodec,
) -> Result<AuthenticatedUser, AuthError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingToken)?;

    sessions.verify(token)
}
