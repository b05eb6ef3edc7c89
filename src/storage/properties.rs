// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Property rows. Listings are seeded out of band; this repository only
//! reads them and records ledger listing ids assigned by the purchase
//! flow.

use sqlx::PgPool;

use super::{StorageError, StorageResult};
use crate::models::Property;

const COLUMNS: &str = "id, title, description, address, price_local, price_eth, image, is_sold, \
                       property_type, ledger_listing_id";

pub struct PropertyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PropertyRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> StorageResult<Vec<Property>> {
        let rows = sqlx::query_as::<_, Property>(&format!(
            "SELECT {COLUMNS} FROM properties ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> StorageResult<Property> {
        sqlx::query_as::<_, Property>(&format!("SELECT {COLUMNS} FROM properties WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("property {id}")))
    }

    /// Record the ledger listing id assigned when the purchase flow
    /// first lists the property on chain.
    pub async fn set_ledger_listing_id(&self, id: i64, listing_id: i64) -> StorageResult<()> {
        let result = sqlx::query("UPDATE properties SET ledger_listing_id = $1 WHERE id = $2")
            .bind(listing_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("property {id}")));
        }
        Ok(())
    }
}
