// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Cookie-based session authentication for the marketplace API.
//!
//! ## Auth Flow
//!
//! 1. Client posts its identity (`{ "email": ... }`) to `POST /jwt`
//! 2. Server signs a one-hour HS256 token and sets it as the HTTP-only
//!    `token` cookie
//! 3. On protected routes the server:
//!    - reads the `token` cookie (401 if absent)
//!    - verifies signature and expiry (401 if invalid)
//!    - exposes the identity to handlers through `Auth`
//! 4. Bid listings additionally require the `email` query parameter to be
//!    the caller's own (403 otherwise)
//!
//! ## Security
//!
//! - Tokens are stateless; `POST /logout` only clears the cookie
//! - No clock skew tolerance on expiry
//! - Client-facing error messages are generic

pub mod claims;
pub mod cookie;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod ownership;
pub mod token;

pub use claims::{AuthenticatedUser, IdentityClaim};
pub use cookie::{SessionCookiePolicy, SESSION_COOKIE};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_session;
pub use ownership::{owner_filter, BidRole};
pub use token::{SessionTokenCodec, SESSION_TTL_SECS};
