// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for bid listings.
//!
//! A caller may only list bids in which they appear, either as the bidder or
//! as the buyer. The requested `email` must be the caller's own; the
//! returned [`Filter`] is always scoped to the caller.

use tracing::warn;

use super::{AuthError, AuthenticatedUser};
use crate::models::fields;
use crate::storage::Filter;

/// Which side of a bid the caller is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidRole {
    /// Bids the caller placed (`userEmail`).
    Bidder,
    /// Bids on the caller's jobs (`buyerEmail`).
    Buyer,
}

impl BidRole {
    pub fn field(self) -> &'static str {
        match self {
            BidRole::Bidder => fields::BID_USER_EMAIL,
            BidRole::Buyer => fields::BID_BUYER_EMAIL,
        }
    }
}

/// Check that `requested` names the caller and return the email to query.
///
/// An absent parameter means "my own records".
///
/// # Errors
/// Returns `AuthError::Forbidden` if `requested` differs from the caller.
pub fn authorize_owner<'a>(
    user: &'a AuthenticatedUser,
    requested: Option<&'a str>,
) -> Result<&'a str, AuthError> {
    match requested {
        Some(email) if email != user.email() => {
            warn!(
                caller = %user.email(),
                requested = %email,
                "Rejected cross-user bid listing"
            );
            Err(AuthError::Forbidden {
                caller: user.email().to_string(),
                requested: email.to_string(),
            })
        }
        _ => Ok(user.email()),
    }
}

/// Authorize the request and build the owner-scoped bid filter.
pub fn owner_filter(
    user: &AuthenticatedUser,
    role: BidRole,
    requested: Option<&str>,
) -> Result<Filter, AuthError> {
    let email = authorize_owner(user, requested)?;
    Ok(Filter::field_equals(role.field(), email))
}
