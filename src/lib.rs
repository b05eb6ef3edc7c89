// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Estate Ledger - Real-Estate Listing & Purchase Service
//!
//! This crate provides a relational backend for property listings, user
//! accounts, and purchase records, with an EVM smart contract
//! (`PropertySale`) as the settlement layer for payments.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Credential handling (Argon2 password hashing)
//! - `ledger` - PropertySale contract client (alloy)
//! - `purchase` - Purchase orchestration with a durable outbox
//! - `storage` - PostgreSQL repositories (sqlx)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod purchase;
pub mod state;
pub mod storage;
