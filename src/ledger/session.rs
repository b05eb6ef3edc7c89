// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! A connected, signing ledger session.
//!
//! All ledger state flows through an explicit [`LedgerSession`]
//! constructed once by [`LedgerSession::connect`] and threaded through
//! the purchase flow; there is no ambient connection or contract
//! binding.

use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, U256},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    signers::local::PrivateKeySigner,
};

use super::contract::PropertySale;
use super::types::{chain_allowed, LedgerError, Listing, LIST_GAS_LIMIT};
use crate::purchase::ListingLedger;

/// HTTP provider type with all fillers and a local signing wallet.
type SignerProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// Connection settings for a ledger session.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Deployed PropertySale contract address.
    pub contract_address: String,
    /// Hex-encoded private key (with or without 0x prefix).
    pub signer_private_key: String,
    /// Chain ids this session will accept.
    pub allowed_chain_ids: Vec<u64>,
}

/// A validated connection to the PropertySale contract.
pub struct LedgerSession {
    provider: SignerProvider,
    contract: PropertySale::PropertySaleInstance<SignerProvider>,
    account: Address,
    chain_id: u64,
}

impl LedgerSession {
    /// Connect and validate: build the signer and provider, check the
    /// chain id against the allow-list, bind the contract, and probe it
    /// with a harmless read to confirm deployment.
    pub async fn connect(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let url: url::Url = config
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| LedgerError::InvalidRpcUrl(e.to_string()))?;

        let key_hex = config
            .signer_private_key
            .strip_prefix("0x")
            .unwrap_or(&config.signer_private_key);
        let key_bytes = alloy::hex::decode(key_hex)
            .map_err(|e| LedgerError::InvalidPrivateKey(e.to_string()))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| LedgerError::InvalidPrivateKey(e.to_string()))?;
        let account = signer.address();

        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;
        if !chain_allowed(&config.allowed_chain_ids, chain_id) {
            return Err(LedgerError::UnsupportedNetwork { chain_id });
        }

        let address = Address::from_str(&config.contract_address)
            .map_err(|e| LedgerError::InvalidAddress(e.to_string()))?;
        let contract = PropertySale::new(address, provider.clone());

        // Probe with a harmless read; a revert here means nothing is
        // deployed at the configured address.
        contract
            .getPropertiesCount()
            .call()
            .await
            .map_err(|e| LedgerError::NotDeployed(e.to_string()))?;

        tracing::info!(%account, chain_id, contract = %address, "ledger session connected");

        Ok(Self {
            provider,
            contract,
            account,
            chain_id,
        })
    }

    /// The session's signing account.
    pub fn account(&self) -> Address {
        self.account
    }

    /// Chain id the session validated against the allow-list.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Read a listing by its ledger id.
    pub async fn get_listing(&self, id: u64) -> Result<Listing, LedgerError> {
        let ret = self
            .contract
            .getProperty(U256::from(id))
            .call()
            .await
            .map_err(|e| LedgerError::ContractError(e.to_string()))?;

        Ok(ret.into_listing(id))
    }

    /// List a property for sale and return the ledger-assigned id,
    /// decoded from the receipt's `PropertyListed` event (a counter
    /// re-read would race against concurrent listings).
    pub async fn list_property(
        &self,
        property_address: &str,
        price_wei: U256,
        title: &str,
        description: &str,
    ) -> Result<u64, LedgerError> {
        let pending = self
            .contract
            .listProperty(
                property_address.to_string(),
                price_wei,
                title.to_string(),
                description.to_string(),
            )
            .from(self.account)
            .gas(LIST_GAS_LIMIT)
            .send()
            .await
            .map_err(|e| LedgerError::ContractError(e.to_string()))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;
        if !receipt.status() {
            return Err(LedgerError::Reverted(format!(
                "listProperty {:?}",
                receipt.transaction_hash
            )));
        }

        receipt
            .logs()
            .iter()
            .find_map(|log| log.log_decode::<PropertySale::PropertyListed>().ok())
            .map(|decoded| decoded.inner.data.id.to::<u64>())
            .ok_or_else(|| {
                LedgerError::ContractError("PropertyListed event missing from receipt".to_string())
            })
    }

    /// Pay for a listing. Estimates gas, submits the paid call with 20%
    /// headroom over the estimate, waits for the receipt, and returns
    /// the transaction hash.
    pub async fn buy_property(&self, id: u64, value_wei: U256) -> Result<String, LedgerError> {
        let call = self
            .contract
            .buyProperty(U256::from(id))
            .from(self.account)
            .value(value_wei);

        let estimate = call
            .estimate_gas()
            .await
            .map_err(|e| LedgerError::ContractError(e.to_string()))?;
        let gas_limit = estimate.saturating_mul(12) / 10;

        let pending = call
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| LedgerError::ContractError(e.to_string()))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;
        if !receipt.status() {
            return Err(LedgerError::Reverted(format!(
                "buyProperty {:?}",
                receipt.transaction_hash
            )));
        }

        Ok(format!("{:?}", receipt.transaction_hash))
    }

    /// Native balance of the session account.
    pub async fn balance(&self) -> Result<U256, LedgerError> {
        self.provider
            .get_balance(self.account)
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))
    }

    /// Recover the hash of the transaction that sold a listing by
    /// querying the contract's `PropertySold` events for its id. Used
    /// when promoting a pending record whose original hash was lost.
    pub async fn find_sale_tx(&self, id: u64) -> Result<Option<String>, LedgerError> {
        let events = self
            .contract
            .PropertySold_filter()
            .topic1(U256::from(id))
            .from_block(0)
            .query()
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;

        Ok(events
            .into_iter()
            .rev()
            .find_map(|(_, log)| log.transaction_hash)
            .map(|hash| format!("{hash:?}")))
    }
}

impl ListingLedger for LedgerSession {
    fn account(&self) -> Address {
        self.account
    }

    async fn get_listing(&self, id: u64) -> Result<Listing, LedgerError> {
        LedgerSession::get_listing(self, id).await
    }

    async fn list_property(
        &self,
        property_address: &str,
        price_wei: U256,
        title: &str,
        description: &str,
    ) -> Result<u64, LedgerError> {
        LedgerSession::list_property(self, property_address, price_wei, title, description).await
    }

    async fn buy_property(&self, id: u64, value_wei: U256) -> Result<String, LedgerError> {
        LedgerSession::buy_property(self, id, value_wei).await
    }

    async fn balance(&self) -> Result<U256, LedgerError> {
        LedgerSession::balance(self).await
    }

    async fn find_sale_tx(&self, id: u64) -> Result<Option<String>, LedgerError> {
        LedgerSession::find_sale_tx(self, id).await
    }
}
