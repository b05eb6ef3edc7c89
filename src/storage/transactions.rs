// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Purchase records.
//!
//! The table doubles as the purchase outbox: `open_pending` persists a
//! row *before* the ledger write, and `complete` promotes it with the
//! transaction hash afterwards. A pending row with no hash therefore
//! marks a purchase whose bookkeeping has not caught up with the chain
//! yet.

use sqlx::PgPool;

use super::{StorageError, StorageResult};
use crate::models::{NewTransaction, TransactionRecord, TransactionWithProperty, TxStatus};

pub struct TransactionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        tx: &NewTransaction,
        tx_hash: Option<&str>,
        status: TxStatus,
    ) -> StorageResult<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO transactions \
             (user_id, property_id, ledger_listing_id, name, email, phone, eth_amount, tx_hash, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(tx.user_id)
        .bind(tx.property_id)
        .bind(tx.ledger_listing_id)
        .bind(&tx.name)
        .bind(&tx.email)
        .bind(&tx.phone)
        .bind(&tx.eth_amount)
        .bind(tx_hash)
        .bind(status.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Insert a completed record in one step (used by the REST endpoint,
    /// which receives the hash from an already-confirmed purchase).
    pub async fn insert_completed(&self, tx: &NewTransaction, tx_hash: &str) -> StorageResult<i64> {
        let id = self.insert(tx, Some(tx_hash), TxStatus::Completed).await?;
        tracing::info!(transaction_id = id, "recorded completed transaction");
        Ok(id)
    }

    /// Open a pending outbox row ahead of a ledger write.
    pub async fn open_pending(&self, tx: &NewTransaction) -> StorageResult<i64> {
        let id = self.insert(tx, None, TxStatus::Pending).await?;
        tracing::info!(transaction_id = id, "opened pending transaction");
        Ok(id)
    }

    /// Promote a pending row with the confirmed transaction hash.
    pub async fn complete(&self, id: i64, tx_hash: &str) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE transactions SET tx_hash = $1, status = $2 WHERE id = $3",
        )
        .bind(tx_hash)
        .bind(TxStatus::Completed.as_str())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("transaction {id}")));
        }

        tracing::info!(transaction_id = id, %tx_hash, "completed transaction");
        Ok(())
    }

    /// All records joined with their property's title and image, newest
    /// first.
    pub async fn list_with_property(&self) -> StorageResult<Vec<TransactionWithProperty>> {
        let rows = sqlx::query_as::<_, TransactionWithProperty>(
            "SELECT t.id, t.user_id, t.property_id, t.ledger_listing_id, t.name, t.email, \
                    t.phone, t.eth_amount, t.tx_hash, t.status, t.created_at, \
                    p.title AS property_title, p.image AS property_image \
             FROM transactions t \
             LEFT JOIN properties p ON t.property_id = p.id \
             ORDER BY t.id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Pending outbox rows, for reconciliation.
    pub async fn list_pending(&self) -> StorageResult<Vec<TransactionRecord>> {
        let rows = sqlx::query_as::<_, TransactionRecord>(
            "SELECT id, user_id, property_id, ledger_listing_id, name, email, phone, \
                    eth_amount, tx_hash, status, created_at \
             FROM transactions WHERE status = $1 ORDER BY id",
        )
        .bind(TxStatus::Pending.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
