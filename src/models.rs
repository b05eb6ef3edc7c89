// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Domain rows shared between the repositories and the API handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Bookkeeping status of a purchase record.
///
/// `Pending` rows are the durable-outbox half of a purchase: they are
/// opened before the ledger write and promoted to `Completed` once the
/// transaction hash is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TxStatus {
    Pending,
    Completed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }
}

/// A registered account. Never updated or deleted by this system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 hash string. Stripped before any response leaves the API.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The client-safe projection of a [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// A listed property. Rows are seeded out of band; the sold flag's
/// authoritative copy lives on the ledger, not here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Property {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
    /// Display price in the local currency.
    pub price_local: i64,
    /// Price in ether, as a decimal string (e.g. "0.05"). Converted to
    /// wei only at the ledger boundary.
    pub price_eth: String,
    /// Image reference; rewritten to an absolute URL in responses.
    pub image: Option<String>,
    pub is_sold: bool,
    pub property_type: Option<String>,
    /// Ledger listing id recorded after the first purchase attempt
    /// lists the property on chain.
    pub ledger_listing_id: Option<i64>,
}

/// A purchase record. Created once per purchase attempt that reaches
/// the persistence step.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransactionRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub property_id: i64,
    pub ledger_listing_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Amount paid, in ether, as a decimal string.
    pub eth_amount: String,
    /// Ledger transaction hash. Absent while the row is still pending.
    pub tx_hash: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Transaction row joined with its property's title and image for the
/// history view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransactionWithProperty {
    pub id: i64,
    pub user_id: Option<i64>,
    pub property_id: i64,
    pub ledger_listing_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub eth_amount: String,
    pub tx_hash: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub property_title: Option<String>,
    pub property_image: Option<String>,
}

/// Input for a new purchase record.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: Option<i64>,
    pub property_id: i64,
    pub ledger_listing_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub eth_amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_strips_the_hash() {
        let user = User {
            id: 7,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".into(),
            created_at: Utc::now(),
        };

        let profile = UserProfile::from(user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("ana@example.com"));
    }

    #[test]
    fn status_round_trips_as_text() {
        assert_eq!(TxStatus::Pending.as_str(), "Pending");
        assert_eq!(TxStatus::Completed.as_str(), "Completed");
    }
}
