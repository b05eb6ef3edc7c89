// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Purchase orchestration.
//!
//! Each purchase runs fresh from the property row and buyer details:
//!
//! 1. resolve (or lazily create) the ledger listing,
//! 2. re-check sold state, seller (reused listings only; a listing
//!    this run just created was signed by the session account and is
//!    expected to name it as seller), and on-chain price,
//! 3. check the account balance against price plus a gas allowance,
//! 4. open a pending bookkeeping row, pay on chain, promote the row.
//!
//! The pending row is the durable-outbox half of the flow: it is
//! persisted *before* the paid write, so a confirmed purchase whose
//! bookkeeping write fails leaves a reconcilable row instead of
//! vanishing. Promotion is retried a bounded number of times and a
//! persistent failure is reported as a warning, never as a purchase
//! failure. [`PurchaseFlow::reconcile`] sweeps the leftover pending
//! rows later, recovering each confirmed sale's hash from the ledger's
//! `PropertySold` events.

use alloy::primitives::{Address, U256};

use crate::ledger::{format_ether, parse_ether, LedgerError, Listing};
use crate::models::{NewTransaction, Property, TransactionRecord};
use crate::storage::StorageError;

/// Wei reserved for gas on top of the listing price: 0.01 ether.
pub const GAS_ALLOWANCE_WEI: u128 = 10_000_000_000_000_000;

/// Promotion attempts before the bookkeeping failure is surfaced as a
/// warning.
pub const BOOKKEEPING_ATTEMPTS: u32 = 3;

/// Read/write access to listings on the ledger, as the purchase flow
/// needs it. Implemented by `LedgerSession`; tests substitute a mock.
#[allow(async_fn_in_trait)]
pub trait ListingLedger {
    fn account(&self) -> Address;
    async fn get_listing(&self, id: u64) -> Result<Listing, LedgerError>;
    async fn list_property(
        &self,
        property_address: &str,
        price_wei: U256,
        title: &str,
        description: &str,
    ) -> Result<u64, LedgerError>;
    async fn buy_property(&self, id: u64, value_wei: U256) -> Result<String, LedgerError>;
    async fn balance(&self) -> Result<U256, LedgerError>;
    /// Transaction hash of the sale that closed a listing, if any.
    async fn find_sale_tx(&self, id: u64) -> Result<Option<String>, LedgerError>;
}

/// The durable-outbox side of a purchase. Implemented by
/// `TransactionRepository`.
#[allow(async_fn_in_trait)]
pub trait PurchaseOutbox {
    async fn open_pending(&self, tx: &NewTransaction) -> Result<i64, StorageError>;
    async fn complete(&self, id: i64, tx_hash: &str) -> Result<(), StorageError>;
    async fn list_pending(&self) -> Result<Vec<TransactionRecord>, StorageError>;
}

impl PurchaseOutbox for crate::storage::TransactionRepository<'_> {
    async fn open_pending(&self, tx: &NewTransaction) -> Result<i64, StorageError> {
        crate::storage::TransactionRepository::open_pending(self, tx).await
    }

    async fn complete(&self, id: i64, tx_hash: &str) -> Result<(), StorageError> {
        crate::storage::TransactionRepository::complete(self, id, tx_hash).await
    }

    async fn list_pending(&self) -> Result<Vec<TransactionRecord>, StorageError> {
        crate::storage::TransactionRepository::list_pending(self).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    #[error("listing is already sold")]
    AlreadySold,

    #[error("the buying account is the seller of this listing")]
    SelfPurchase,

    #[error("price mismatch: listing is priced at {on_chain} ETH on the ledger, expected {expected} ETH")]
    PriceMismatch { expected: String, on_chain: String },

    #[error("insufficient funds: {required} ETH required including gas allowance, balance is {balance} ETH")]
    InsufficientFunds { required: String, balance: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The pending record could not be opened; the purchase is aborted
    /// before any paid write.
    #[error("failed to open purchase record: {0}")]
    Outbox(#[from] StorageError),
}

/// Buyer details for a purchase run.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub property: Property,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: Option<String>,
    pub user_id: Option<i64>,
}

/// Whether the purchase record caught up with the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bookkeeping {
    Recorded {
        transaction_id: i64,
    },
    /// The ledger write is confirmed but the record is still pending;
    /// it can be promoted later via the outbox.
    Pending {
        transaction_id: i64,
        warning: String,
    },
}

/// Terminal outcome of a successful purchase.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub listing_id: u64,
    pub tx_hash: String,
    pub amount_eth: String,
    pub bookkeeping: Bookkeeping,
}

pub struct PurchaseFlow<'a, L, O> {
    ledger: &'a L,
    outbox: &'a O,
}

impl<'a, L: ListingLedger, O: PurchaseOutbox> PurchaseFlow<'a, L, O> {
    pub fn new(ledger: &'a L, outbox: &'a O) -> Self {
        Self { ledger, outbox }
    }

    pub async fn execute(&self, request: &PurchaseRequest) -> Result<PurchaseOutcome, PurchaseError> {
        let property = &request.property;
        let price_wei = parse_ether(&property.price_eth)?;

        let (listing_id, just_listed) = self.resolve_listing(property, price_wei).await?;

        let listing = self.ledger.get_listing(listing_id).await?;
        if listing.is_sold {
            return Err(PurchaseError::AlreadySold);
        }
        // The contract records the lister as seller, so a listing this
        // run just created always names the session account; the
        // self-purchase rule only applies to reused listings.
        if !just_listed && listing.seller == self.ledger.account() {
            return Err(PurchaseError::SelfPurchase);
        }

        if listing.price_wei != price_wei {
            return Err(PurchaseError::PriceMismatch {
                expected: format_ether(price_wei),
                on_chain: format_ether(listing.price_wei),
            });
        }

        let balance = self.ledger.balance().await?;
        let required = price_wei + U256::from(GAS_ALLOWANCE_WEI);
        if balance < required {
            return Err(PurchaseError::InsufficientFunds {
                required: format_ether(required),
                balance: format_ether(balance),
            });
        }

        // Persist the record before the paid write. If this fails the
        // purchase aborts with nothing spent.
        let record = NewTransaction {
            user_id: request.user_id,
            property_id: property.id,
            ledger_listing_id: Some(listing_id as i64),
            name: request.buyer_name.clone(),
            email: request.buyer_email.clone(),
            phone: request.buyer_phone.clone(),
            eth_amount: property.price_eth.clone(),
        };
        let transaction_id = self.outbox.open_pending(&record).await?;

        let tx_hash = self.ledger.buy_property(listing_id, price_wei).await?;
        tracing::info!(listing_id, %tx_hash, "purchase confirmed on ledger");

        let bookkeeping = self.promote(transaction_id, &tx_hash).await;

        Ok(PurchaseOutcome {
            listing_id,
            tx_hash,
            amount_eth: property.price_eth.clone(),
            bookkeeping,
        })
    }

    /// Reuse the property's recorded listing id if it still resolves to
    /// an unsold, titled listing; otherwise list the property now. The
    /// flag reports whether the listing was created by this call.
    async fn resolve_listing(
        &self,
        property: &Property,
        price_wei: U256,
    ) -> Result<(u64, bool), PurchaseError> {
        if let Some(known) = property.ledger_listing_id {
            if known > 0 {
                match self.ledger.get_listing(known as u64).await {
                    Ok(listing) if !listing.is_sold && !listing.title.is_empty() => {
                        return Ok((known as u64, false));
                    }
                    Ok(_) => {
                        tracing::info!(listing_id = known, "recorded listing is stale, relisting");
                    }
                    Err(e) => {
                        tracing::info!(listing_id = known, error = %e, "recorded listing unresolvable, relisting");
                    }
                }
            }
        }

        let address = property
            .address
            .clone()
            .unwrap_or_else(|| format!("Property {} address", property.id));
        let description = property
            .description
            .clone()
            .unwrap_or_else(|| format!("{} - listed for sale", property.title));

        let id = self
            .ledger
            .list_property(&address, price_wei, &property.title, &description)
            .await?;
        tracing::info!(listing_id = id, property_id = property.id, "listed property on ledger");
        Ok((id, true))
    }

    /// Sweep pending records whose ledger write already confirmed and
    /// promote them with the hash recovered from the sale event. Rows
    /// whose listing is unsold, or was sold to a different account, are
    /// left pending.
    pub async fn reconcile(&self) -> Result<u32, PurchaseError> {
        let pending = self.outbox.list_pending().await?;
        let mut promoted = 0;

        for row in pending {
            let Some(listing_id) = row.ledger_listing_id.filter(|&id| id > 0) else {
                continue;
            };
            let listing_id = listing_id as u64;

            let listing = match self.ledger.get_listing(listing_id).await {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!(transaction_id = row.id, listing_id, error = %e, "listing unreadable during reconciliation");
                    continue;
                }
            };
            if !listing.is_sold || listing.buyer != self.ledger.account() {
                continue;
            }

            match self.ledger.find_sale_tx(listing_id).await {
                Ok(Some(tx_hash)) => match self.outbox.complete(row.id, &tx_hash).await {
                    Ok(()) => {
                        tracing::info!(transaction_id = row.id, listing_id, %tx_hash, "reconciled pending purchase record");
                        promoted += 1;
                    }
                    Err(e) => {
                        tracing::warn!(transaction_id = row.id, error = %e, "failed to promote record during reconciliation");
                    }
                },
                Ok(None) => {
                    tracing::warn!(transaction_id = row.id, listing_id, "sold listing has no sale event");
                }
                Err(e) => {
                    tracing::warn!(transaction_id = row.id, listing_id, error = %e, "sale lookup failed during reconciliation");
                }
            }
        }

        Ok(promoted)
    }

    async fn promote(&self, transaction_id: i64, tx_hash: &str) -> Bookkeeping {
        for attempt in 1..=BOOKKEEPING_ATTEMPTS {
            match self.outbox.complete(transaction_id, tx_hash).await {
                Ok(()) => return Bookkeeping::Recorded { transaction_id },
                Err(e) => {
                    tracing::warn!(transaction_id, attempt, error = %e, "failed to promote purchase record");
                }
            }
        }

        Bookkeeping::Pending {
            transaction_id,
            warning: "payment confirmed on the ledger, but the purchase record could not be \
                      completed; it remains pending for reconciliation"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn property(price_eth: &str, listing_id: Option<i64>) -> Property {
        Property {
            id: 42,
            title: "Villa Kemang".into(),
            description: Some("Three bedrooms, garden".into()),
            address: Some("Jl. Kemang Raya 10".into()),
            price_local: 850_000_000,
            price_eth: price_eth.into(),
            image: Some("villa.jpg".into()),
            is_sold: false,
            property_type: Some("villa".into()),
            ledger_listing_id: listing_id,
        }
    }

    fn request(price_eth: &str, listing_id: Option<i64>) -> PurchaseRequest {
        PurchaseRequest {
            property: property(price_eth, listing_id),
            buyer_name: "Budi".into(),
            buyer_email: "budi@example.com".into(),
            buyer_phone: None,
            user_id: Some(1),
        }
    }

    fn listing(id: u64, price_eth: &str, seller: Address, sold: bool) -> Listing {
        Listing {
            id,
            title: "Villa Kemang".into(),
            description: "Three bedrooms, garden".into(),
            property_address: "Jl. Kemang Raya 10".into(),
            price_wei: parse_ether(price_eth).unwrap(),
            seller,
            buyer: Address::ZERO,
            is_sold: sold,
        }
    }

    const BUYER: Address = Address::repeat_byte(0xaa);
    const SELLER: Address = Address::repeat_byte(0xbb);

    struct MockLedger {
        listings: Mutex<HashMap<u64, Listing>>,
        balance: U256,
        next_id: u64,
        buys: Mutex<Vec<(u64, U256)>>,
        listed: Mutex<Vec<String>>,
        reads: Mutex<u32>,
        /// Simulates a competing buyer: the listing reads as sold from
        /// the given get_listing call onward.
        sold_from_read: Option<u32>,
    }

    impl MockLedger {
        fn new(balance_eth: &str) -> Self {
            Self {
                listings: Mutex::new(HashMap::new()),
                balance: parse_ether(balance_eth).unwrap(),
                next_id: 7,
                buys: Mutex::new(Vec::new()),
                listed: Mutex::new(Vec::new()),
                reads: Mutex::new(0),
                sold_from_read: None,
            }
        }

        fn with_listing(self, l: Listing) -> Self {
            self.listings.lock().unwrap().insert(l.id, l);
            self
        }
    }

    impl ListingLedger for MockLedger {
        fn account(&self) -> Address {
            BUYER
        }

        async fn get_listing(&self, id: u64) -> Result<Listing, LedgerError> {
            let read = {
                let mut reads = self.reads.lock().unwrap();
                *reads += 1;
                *reads
            };
            let mut listing = self
                .listings
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| LedgerError::ContractError("revert: no such property".into()))?;
            if matches!(self.sold_from_read, Some(from) if read >= from) {
                listing.is_sold = true;
            }
            Ok(listing)
        }

        async fn list_property(
            &self,
            _property_address: &str,
            price_wei: U256,
            title: &str,
            description: &str,
        ) -> Result<u64, LedgerError> {
            let id = self.next_id;
            self.listed.lock().unwrap().push(title.to_string());
            // Contract semantics: the lister becomes the seller.
            self.listings.lock().unwrap().insert(
                id,
                Listing {
                    id,
                    title: title.to_string(),
                    description: description.to_string(),
                    property_address: _property_address.to_string(),
                    price_wei,
                    seller: self.account(),
                    buyer: Address::ZERO,
                    is_sold: false,
                },
            );
            Ok(id)
        }

        async fn buy_property(&self, id: u64, value_wei: U256) -> Result<String, LedgerError> {
            self.buys.lock().unwrap().push((id, value_wei));
            Ok(format!("0x{:064x}", id))
        }

        async fn balance(&self) -> Result<U256, LedgerError> {
            Ok(self.balance)
        }

        async fn find_sale_tx(&self, id: u64) -> Result<Option<String>, LedgerError> {
            Ok(self
                .listings
                .lock()
                .unwrap()
                .get(&id)
                .filter(|l| l.is_sold)
                .map(|_| format!("0x{id:064x}")))
        }
    }

    #[derive(Default)]
    struct MockOutbox {
        rows: Mutex<Vec<Option<String>>>,
        listing_ids: Mutex<Vec<Option<i64>>>,
        fail_complete: bool,
    }

    impl MockOutbox {
        fn with_pending(self, listing_id: Option<i64>) -> Self {
            self.rows.lock().unwrap().push(None);
            self.listing_ids.lock().unwrap().push(listing_id);
            self
        }
    }

    impl PurchaseOutbox for MockOutbox {
        async fn open_pending(&self, tx: &NewTransaction) -> Result<i64, StorageError> {
            let mut rows = self.rows.lock().unwrap();
            rows.push(None);
            self.listing_ids.lock().unwrap().push(tx.ledger_listing_id);
            Ok(rows.len() as i64)
        }

        async fn complete(&self, id: i64, tx_hash: &str) -> Result<(), StorageError> {
            if self.fail_complete {
                return Err(StorageError::NotFound("store offline".into()));
            }
            self.rows.lock().unwrap()[(id - 1) as usize] = Some(tx_hash.to_string());
            Ok(())
        }

        async fn list_pending(&self) -> Result<Vec<TransactionRecord>, StorageError> {
            let rows = self.rows.lock().unwrap();
            let listing_ids = self.listing_ids.lock().unwrap();
            Ok(rows
                .iter()
                .enumerate()
                .filter(|(_, hash)| hash.is_none())
                .map(|(i, _)| TransactionRecord {
                    id: (i + 1) as i64,
                    user_id: Some(1),
                    property_id: 42,
                    ledger_listing_id: listing_ids[i],
                    name: "Budi".into(),
                    email: "budi@example.com".into(),
                    phone: None,
                    eth_amount: "0.05".into(),
                    tx_hash: None,
                    status: "Pending".into(),
                    created_at: chrono::Utc::now(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn insufficient_funds_blocks_before_any_write() {
        // 0.05 ETH listing, 0.04 ETH balance: fails before the ledger
        // write and before the outbox row.
        let ledger = MockLedger::new("0.04").with_listing(listing(7, "0.05", SELLER, false));
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let err = flow.execute(&request("0.05", Some(7))).await.unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientFunds { .. }));
        assert!(ledger.buys.lock().unwrap().is_empty());
        assert!(outbox.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn balance_must_cover_gas_allowance_too() {
        // Exactly the price is not enough: the gas allowance is on top.
        let ledger = MockLedger::new("0.05").with_listing(listing(7, "0.05", SELLER, false));
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let err = flow.execute(&request("0.05", Some(7))).await.unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientFunds { .. }));
    }

    #[tokio::test]
    async fn listing_sold_between_resolve_and_recheck_is_rejected() {
        // The reuse probe sees the listing unsold, then a competing
        // buyer lands first and the re-read sees it sold.
        let mut ledger = MockLedger::new("1").with_listing(listing(7, "0.05", SELLER, false));
        ledger.sold_from_read = Some(2);
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let err = flow.execute(&request("0.05", Some(7))).await.unwrap_err();
        assert!(matches!(err, PurchaseError::AlreadySold));
        assert!(ledger.buys.lock().unwrap().is_empty());
        assert!(outbox.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_purchase_is_rejected() {
        let ledger = MockLedger::new("1").with_listing(listing(7, "0.05", BUYER, false));
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let err = flow.execute(&request("0.05", Some(7))).await.unwrap_err();
        assert!(matches!(err, PurchaseError::SelfPurchase));
        assert!(ledger.buys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn price_drift_is_rejected() {
        // On-chain price 0.06, display price 0.05.
        let ledger = MockLedger::new("1").with_listing(listing(7, "0.06", SELLER, false));
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let err = flow.execute(&request("0.05", Some(7))).await.unwrap_err();
        match err {
            PurchaseError::PriceMismatch { expected, on_chain } => {
                assert_eq!(expected, "0.05");
                assert_eq!(on_chain, "0.06");
            }
            other => panic!("expected PriceMismatch, got {other}"),
        }
        assert!(ledger.buys.lock().unwrap().is_empty());
        assert!(outbox.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn happy_path_records_and_buys() {
        let ledger = MockLedger::new("1").with_listing(listing(7, "0.05", SELLER, false));
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let outcome = flow.execute(&request("0.05", Some(7))).await.unwrap();
        assert_eq!(outcome.listing_id, 7);
        assert_eq!(outcome.amount_eth, "0.05");
        assert!(matches!(outcome.bookkeeping, Bookkeeping::Recorded { transaction_id: 1 }));

        let buys = ledger.buys.lock().unwrap();
        assert_eq!(buys.len(), 1);
        assert_eq!(buys[0], (7, parse_ether("0.05").unwrap()));

        // The outbox row was promoted with the hash.
        let rows = outbox.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_deref(), Some(outcome.tx_hash.as_str()));
    }

    #[tokio::test]
    async fn missing_listing_is_created_lazily() {
        let ledger = MockLedger::new("1");
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let outcome = flow.execute(&request("0.05", None)).await.unwrap();
        assert_eq!(outcome.listing_id, 7); // the mock's next id
        assert_eq!(ledger.listed.lock().unwrap().as_slice(), ["Villa Kemang"]);
        assert_eq!(ledger.buys.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lazily_listed_property_is_purchasable_by_its_lister() {
        // The session account signs the lazy listProperty call, so the
        // fresh listing names it as seller; that must not be mistaken
        // for a self-purchase.
        let ledger = MockLedger::new("1");
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let outcome = flow.execute(&request("0.05", None)).await.unwrap();
        assert_eq!(
            ledger.listings.lock().unwrap()[&outcome.listing_id].seller,
            BUYER
        );
        assert_eq!(ledger.buys.lock().unwrap().len(), 1);
        assert!(matches!(outcome.bookkeeping, Bookkeeping::Recorded { .. }));
    }

    #[tokio::test]
    async fn stale_recorded_listing_is_relisted() {
        // The recorded id resolves to a sold listing, so the flow lists
        // a fresh one instead of failing.
        let ledger = MockLedger::new("1").with_listing(listing(3, "0.05", SELLER, true));
        let outbox = MockOutbox::default();
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let outcome = flow.execute(&request("0.05", Some(3))).await.unwrap();
        assert_eq!(outcome.listing_id, 7);
        assert_eq!(ledger.listed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bookkeeping_failure_is_a_warning_not_an_error() {
        let ledger = MockLedger::new("1").with_listing(listing(7, "0.05", SELLER, false));
        let outbox = MockOutbox {
            fail_complete: true,
            ..Default::default()
        };
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let outcome = flow.execute(&request("0.05", Some(7))).await.unwrap();
        assert!(!outcome.tx_hash.is_empty());
        match outcome.bookkeeping {
            Bookkeeping::Pending { transaction_id, ref warning } => {
                assert_eq!(transaction_id, 1);
                assert!(warning.contains("pending"));
            }
            ref other => panic!("expected pending bookkeeping, got {other:?}"),
        }

        // The payment went through exactly once and the pending row is
        // still there for reconciliation.
        assert_eq!(ledger.buys.lock().unwrap().len(), 1);
        assert_eq!(outbox.rows.lock().unwrap().as_slice(), [None]);
    }

    #[tokio::test]
    async fn reconciliation_promotes_rows_for_confirmed_sales() {
        // Listing 7 was bought by the session account, but its record
        // was left pending; the sweep recovers the hash and promotes.
        let mut sold = listing(7, "0.05", SELLER, true);
        sold.buyer = BUYER;
        let ledger = MockLedger::new("1").with_listing(sold);
        let outbox = MockOutbox::default().with_pending(Some(7));
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let promoted = flow.reconcile().await.unwrap();
        assert_eq!(promoted, 1);

        let rows = outbox.rows.lock().unwrap();
        assert_eq!(rows[0].as_deref(), Some(format!("0x{:064x}", 7u64).as_str()));
    }

    #[tokio::test]
    async fn reconciliation_leaves_unconfirmed_rows_pending() {
        // Listing 5 never sold; listing 9 sold to a different account
        // (the pending row belongs to a purchase that failed before
        // paying). Neither row may be promoted.
        let mut foreign_sale = listing(9, "0.05", SELLER, true);
        foreign_sale.buyer = Address::repeat_byte(0xcc);
        let ledger = MockLedger::new("1")
            .with_listing(listing(5, "0.05", SELLER, false))
            .with_listing(foreign_sale);
        let outbox = MockOutbox::default()
            .with_pending(Some(5))
            .with_pending(Some(9))
            .with_pending(None);
        let flow = PurchaseFlow::new(&ledger, &outbox);

        let promoted = flow.reconcile().await.unwrap();
        assert_eq!(promoted, 0);
        assert_eq!(outbox.rows.lock().unwrap().as_slice(), [None, None, None]);
    }
}
