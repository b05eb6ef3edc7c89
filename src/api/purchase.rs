// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Server-side purchase endpoint: connects a ledger session, runs the
//! purchase flow, and records the bookkeeping outcome.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    ledger::{LedgerError, LedgerSession},
    purchase::{Bookkeeping, PurchaseError, PurchaseFlow, PurchaseRequest},
    state::AppState,
    storage::{PropertyRepository, StorageError, TransactionRepository},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseRequestBody {
    pub property_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub user_id: Option<i64>,
}

/// Whether the purchase record caught up with the ledger write.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookkeepingStatus {
    pub recorded: bool,
    #[serde(rename = "transactionId")]
    pub transaction_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseResponse {
    pub success: bool,
    #[serde(rename = "listingId")]
    pub listing_id: u64,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
    #[serde(rename = "ethAmount")]
    pub amount_eth: String,
    pub bookkeeping: BookkeepingStatus,
}

fn ledger_error(err: LedgerError, development: bool) -> ApiError {
    match err {
        LedgerError::UnsupportedNetwork { .. }
        | LedgerError::NotDeployed(_)
        | LedgerError::RpcError(_) => ApiError::service_unavailable(err.to_string()),
        LedgerError::InvalidAmount(_) => ApiError::bad_request(err.to_string()),
        LedgerError::ContractError(_) | LedgerError::Reverted(_) => {
            ApiError::conflict(err.to_string())
        }
        LedgerError::InvalidRpcUrl(_)
        | LedgerError::InvalidAddress(_)
        | LedgerError::InvalidPrivateKey(_) => ApiError::internal(err, development),
    }
}

fn purchase_error(err: PurchaseError, development: bool) -> ApiError {
    match err {
        PurchaseError::AlreadySold
        | PurchaseError::SelfPurchase
        | PurchaseError::PriceMismatch { .. } => ApiError::conflict(err.to_string()),
        PurchaseError::InsufficientFunds { .. } => ApiError::payment_required(err.to_string()),
        PurchaseError::Ledger(e) => ledger_error(e, development),
        PurchaseError::Outbox(e) => ApiError::internal(e, development),
    }
}

/// Buy a property through the service signer.
#[utoipa::path(
    post,
    path = "/api/purchase",
    tag = "Purchase",
    request_body = PurchaseRequestBody,
    responses(
        (status = 200, description = "Purchase confirmed on the ledger", body = PurchaseResponse),
        (status = 400, description = "Missing buyer details"),
        (status = 402, description = "Signer balance cannot cover price plus gas"),
        (status = 404, description = "Unknown property"),
        (status = 409, description = "Listing sold, self-purchase, or price drift"),
        (status = 503, description = "Ledger unreachable or not configured")
    )
)]
pub async fn purchase_property(
    State(state): State<AppState>,
    Json(req): Json<PurchaseRequestBody>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(ApiError::bad_request("name and email are required"));
    }

    let development = state.config.development;
    let properties = PropertyRepository::new(&state.pool);
    let property = properties.get(req.property_id).await.map_err(|e| match e {
        StorageError::NotFound(_) => ApiError::not_found("Property not found"),
        other => ApiError::internal(other, development),
    })?;

    let ledger_config = state
        .config
        .ledger()
        .ok_or_else(|| ApiError::service_unavailable("Ledger is not configured"))?;
    let session = LedgerSession::connect(&ledger_config)
        .await
        .map_err(|e| ledger_error(e, development))?;

    let outbox = TransactionRepository::new(&state.pool);
    let flow = PurchaseFlow::new(&session, &outbox);
    let outcome = flow
        .execute(&PurchaseRequest {
            property: property.clone(),
            buyer_name: req.name.trim().to_string(),
            buyer_email: req.email.trim().to_string(),
            buyer_phone: req.phone.clone(),
            user_id: req.user_id,
        })
        .await
        .map_err(|e| purchase_error(e, development))?;

    // Remember the listing id so later purchases of re-listed rows skip
    // the relist. Best effort; the outcome already stands.
    if property.ledger_listing_id != Some(outcome.listing_id as i64) {
        if let Err(e) = properties
            .set_ledger_listing_id(property.id, outcome.listing_id as i64)
            .await
        {
            tracing::warn!(property_id = property.id, error = %e, "failed to record listing id");
        }
    }

    let bookkeeping = match outcome.bookkeeping {
        Bookkeeping::Recorded { transaction_id } => BookkeepingStatus {
            recorded: true,
            transaction_id,
            warning: None,
        },
        Bookkeeping::Pending {
            transaction_id,
            warning,
        } => BookkeepingStatus {
            recorded: false,
            transaction_id,
            warning: Some(warning),
        },
    };

    Ok(Json(PurchaseResponse {
        success: true,
        listing_id: outcome.listing_id,
        tx_hash: outcome.tx_hash,
        amount_eth: outcome.amount_eth,
        bookkeeping,
    }))
}
