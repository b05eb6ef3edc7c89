// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! # Relational Storage Module
//!
//! Parameterized queries over a PostgreSQL pool. All statements are
//! issued independently; there are no explicit SQL transactions and no
//! migration framework. The schema is created idempotently at startup.
//!
//! ## Tables
//!
//! ```text
//! users         accounts (email carries a UNIQUE constraint)
//! properties    listings, seeded out of band
//! transactions  purchase records; doubles as the purchase outbox
//! ```
//!
//! Multi-row invariants rely on store-level constraints: duplicate
//! registration is rejected by the unique index on `users.email`, not
//! by an application-level existence check.

use sqlx::{postgres::PgPoolOptions, PgPool};

pub mod properties;
pub mod transactions;
pub mod users;

pub use properties::PropertyRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use crate::config::DB_POOL_SIZE;

/// Errors surfaced by the repositories.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A unique constraint rejected the write (SQLSTATE 23505).
    #[error("duplicate value: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Map a sqlx error to `Conflict` when it is a unique violation.
pub(crate) fn map_unique_violation(err: sqlx::Error, what: &str) -> StorageError {
    let is_unique = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false);

    if is_unique {
        StorageError::Conflict(what.to_string())
    } else {
        StorageError::Database(err)
    }
}

/// Connect to PostgreSQL with the fixed-size pool.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DB_POOL_SIZE)
        .connect(database_url)
        .await
}

/// Create the schema if it does not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id            BIGSERIAL PRIMARY KEY,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS properties (
            id                BIGSERIAL PRIMARY KEY,
            title             TEXT NOT NULL,
            description       TEXT,
            address           TEXT,
            price_local       BIGINT NOT NULL,
            price_eth         TEXT NOT NULL,
            image             TEXT,
            is_sold           BOOLEAN NOT NULL DEFAULT FALSE,
            property_type     TEXT,
            ledger_listing_id BIGINT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS transactions (
            id                BIGSERIAL PRIMARY KEY,
            user_id           BIGINT,
            property_id       BIGINT NOT NULL,
            ledger_listing_id BIGINT,
            name              TEXT NOT NULL,
            email             TEXT NOT NULL,
            phone             TEXT,
            eth_amount        TEXT NOT NULL,
            tx_hash           TEXT,
            status            TEXT NOT NULL,
            created_at        TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
