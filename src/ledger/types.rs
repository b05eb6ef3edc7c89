// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Ledger types and constants.

use alloy::primitives::{Address, U256};

/// Chain ids accepted by default: the ids the reference deployment's
/// development chains present. Overridable via `ALLOWED_CHAIN_IDS`.
pub const DEFAULT_ALLOWED_CHAIN_IDS: [u64; 3] = [1337, 5777, 22391];

/// Fixed gas ceiling for `listProperty` writes.
pub const LIST_GAS_LIMIT: u64 = 800_000;

/// Whether a chain id is on the allow-list.
pub fn chain_allowed(allowed: &[u64], chain_id: u64) -> bool {
    allowed.contains(&chain_id)
}

/// A property's representation on the ledger, owned entirely by the
/// contract. The backend never writes these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Ledger-assigned listing id.
    pub id: u64,
    pub title: String,
    pub description: String,
    pub property_address: String,
    /// Asking price in wei.
    pub price_wei: U256,
    pub seller: Address,
    /// Zero until sold.
    pub buyer: Address,
    pub is_sold: bool,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unsupported network (chain id {chain_id})")]
    UnsupportedNetwork { chain_id: u64 },

    #[error("Contract not reachable at the configured address: {0}")]
    NotDeployed(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Transaction reverted: {0}")]
    Reverted(String),
}
