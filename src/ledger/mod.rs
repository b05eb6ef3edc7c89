// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Ledger integration module for the PropertySale contract.
//!
//! This module provides functionality for:
//! - Connecting a signing session to an allowed network
//! - Reading listings and native balances
//! - Listing properties and paying for them on chain

pub mod contract;
pub mod session;
pub mod types;
pub mod units;

pub use session::{LedgerConfig, LedgerSession};
pub use types::*;
pub use units::{format_ether, parse_ether};
