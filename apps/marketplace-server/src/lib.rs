// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Marketplace Server - Freelance Jobs and Bids Backend
//!
//! This crate provides the HTTP backend of a freelance marketplace: clients
//! post jobs, freelancers bid on them, and both sides review their bids
//! behind a cookie-carried session token.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session tokens, cookies and bid ownership checks
//! - `config` - Environment-driven server configuration
//! - `storage` - Embedded document store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
