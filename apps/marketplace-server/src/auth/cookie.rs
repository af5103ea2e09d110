// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie construction.
//!
//! In production the frontend lives on another site, so the cookie must be
//! `Secure` and `SameSite=None` to be sent cross-site. Everywhere else it is
//! `SameSite=Strict` and usable over plain HTTP.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::Environment;

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionCookiePolicy {
    environment: Environment,
}

impl SessionCookiePolicy {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// HTTP-only cookie carrying `token`.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        self.base(token)
    }

    /// Cookie that makes the browser drop the session cookie immediately
    /// (empty value, `Max-Age=0`, expiry in the past).
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.make_removal();
        cookie
    }

    fn base(&self, value: String) -> Cookie<'static> {
        let production = self.environment.is_production();
        Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(production)
            .same_site(if production {
                SameSite::None
            } else {
                SameSite::Strict
            })
            .build()
    }
}
