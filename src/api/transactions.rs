// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Purchase record endpoints: external recording of an already-confirmed
//! purchase, and the joined history view.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    models::{NewTransaction, TransactionWithProperty},
    state::AppState,
    storage::TransactionRepository,
};

/// Record of a purchase confirmed elsewhere (e.g. a browser wallet).
/// The hash is required; the row is written already completed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    pub user_id: Option<i64>,
    pub property_id: Option<i64>,
    /// Ledger listing id, when the caller knows it.
    #[serde(rename = "blockchain_property_id")]
    pub ledger_listing_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    /// Amount in ether. Accepts a number or a string.
    #[serde(rename = "ethAmount")]
    pub eth_amount: Option<serde_json::Value>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTransactionResponse {
    pub success: bool,
    #[serde(rename = "transactionId")]
    pub transaction_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub success: bool,
    pub data: Vec<TransactionWithProperty>,
    pub count: usize,
}

/// Names of the required fields a request left out.
fn missing_fields(req: &CreateTransactionRequest) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if req.name.trim().is_empty() {
        missing.push("name");
    }
    if req.email.trim().is_empty() {
        missing.push("email");
    }
    if req.property_id.is_none() {
        missing.push("property_id");
    }
    if eth_amount_text(req).is_none() {
        missing.push("ethAmount");
    }
    if req.tx_hash.as_deref().map_or(true, |h| h.trim().is_empty()) {
        missing.push("txHash");
    }
    missing
}

/// Normalize the amount to its decimal text form, whichever JSON type
/// the client sent it as.
fn eth_amount_text(req: &CreateTransactionRequest) -> Option<String> {
    match req.eth_amount.as_ref()? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Record a completed purchase.
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = CreateTransactionResponse),
        (status = 400, description = "Required fields missing"),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreateTransactionResponse>), ApiError> {
    let missing = missing_fields(&req);
    if !missing.is_empty() {
        return Err(ApiError::missing_fields(missing));
    }

    let record = NewTransaction {
        user_id: req.user_id,
        property_id: req.property_id.unwrap_or_default(),
        ledger_listing_id: req.ledger_listing_id,
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        phone: req.phone.clone(),
        eth_amount: eth_amount_text(&req).unwrap_or_default(),
    };
    let tx_hash = req.tx_hash.as_deref().unwrap_or_default().trim().to_string();

    let repo = TransactionRepository::new(&state.pool);
    let transaction_id = repo
        .insert_completed(&record, &tx_hash)
        .await
        .map_err(|e| ApiError::internal(e, state.config.development))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTransactionResponse {
            success: true,
            transaction_id,
        }),
    ))
}

/// All purchase records, newest first, with the property's title and
/// image joined in.
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    responses(
        (status = 200, description = "All purchase records", body = TransactionListResponse),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let repo = TransactionRepository::new(&state.pool);
    let data = repo
        .list_with_property()
        .await
        .map_err(|e| ApiError::internal(e, state.config.development))?;

    let count = data.len();
    Ok(Json(TransactionListResponse {
        success: true,
        data,
        count,
    }))
}
