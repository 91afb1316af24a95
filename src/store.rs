//! Keyed auction state observed by the UI.
//!
//! One `StoreWriter` exists per store and it is not `Clone`: the projector's
//! merge callback is the only writer. Readers take snapshots.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use solana_program::pubkey::Pubkey;

use crate::state::{
    AuctionData, AuctionDataExtended, AuctionManager, BidderMetadata, BidderPot,
    ExternalPriceAccount, SafetyDepositBox, Store, Vault, WhitelistedCreator,
};

/// One decoded record, keyed by its account address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateUpdate {
    Auction(Pubkey, AuctionData),
    AuctionDataExtended(Pubkey, AuctionDataExtended),
    BidderMetadata(Pubkey, BidderMetadata),
    BidderPot(Pubkey, BidderPot),
    Vault(Pubkey, Vault),
    SafetyDepositBox(Pubkey, SafetyDepositBox),
    ExternalPriceAccount(Pubkey, ExternalPriceAccount),
    Store(Pubkey, Store),
    WhitelistedCreator(Pubkey, WhitelistedCreator),
    AuctionManager(Pubkey, AuctionManager),
}

impl StateUpdate {
    pub fn key(&self) -> &Pubkey {
        match self {
            StateUpdate::Auction(key, _)
            | StateUpdate::AuctionDataExtended(key, _)
            | StateUpdate::BidderMetadata(key, _)
            | StateUpdate::BidderPot(key, _)
            | StateUpdate::Vault(key, _)
            | StateUpdate::SafetyDepositBox(key, _)
            | StateUpdate::ExternalPriceAccount(key, _)
            | StateUpdate::Store(key, _)
            | StateUpdate::WhitelistedCreator(key, _)
            | StateUpdate::AuctionManager(key, _) => key,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StateUpdate::Auction(..) => "auction",
            StateUpdate::AuctionDataExtended(..) => "auction_data_extended",
            StateUpdate::BidderMetadata(..) => "bidder_metadata",
            StateUpdate::BidderPot(..) => "bidder_pot",
            StateUpdate::Vault(..) => "vault",
            StateUpdate::SafetyDepositBox(..) => "safety_deposit_box",
            StateUpdate::ExternalPriceAccount(..) => "external_price_account",
            StateUpdate::Store(..) => "store",
            StateUpdate::WhitelistedCreator(..) => "whitelisted_creator",
            StateUpdate::AuctionManager(..) => "auction_manager",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaState {
    pub auctions: HashMap<Pubkey, AuctionData>,
    pub auction_data_extended: HashMap<Pubkey, AuctionDataExtended>,
    pub bidder_metadata: HashMap<Pubkey, BidderMetadata>,
    pub bidder_pots: HashMap<Pubkey, BidderPot>,
    pub vaults: HashMap<Pubkey, Vault>,
    pub safety_deposit_boxes: HashMap<Pubkey, SafetyDepositBox>,
    pub external_price_accounts: HashMap<Pubkey, ExternalPriceAccount>,
    pub stores: HashMap<Pubkey, Store>,
    pub whitelisted_creators: HashMap<Pubkey, WhitelistedCreator>,
    pub auction_managers: HashMap<Pubkey, AuctionManager>,
}

impl MetaState {
    /// Last write wins per key; applying the same update twice is a no-op.
    pub fn apply(&mut self, update: StateUpdate) {
        match update {
            StateUpdate::Auction(key, record) => {
                self.auctions.insert(key, record);
            }
            StateUpdate::AuctionDataExtended(key, record) => {
                self.auction_data_extended.insert(key, record);
            }
            StateUpdate::BidderMetadata(key, record) => {
                self.bidder_metadata.insert(key, record);
            }
            StateUpdate::BidderPot(key, record) => {
                self.bidder_pots.insert(key, record);
            }
            StateUpdate::Vault(key, record) => {
                self.vaults.insert(key, record);
            }
            StateUpdate::SafetyDepositBox(key, record) => {
                self.safety_deposit_boxes.insert(key, record);
            }
            StateUpdate::ExternalPriceAccount(key, record) => {
                self.external_price_accounts.insert(key, record);
            }
            StateUpdate::Store(key, record) => {
                self.stores.insert(key, record);
            }
            StateUpdate::WhitelistedCreator(key, record) => {
                self.whitelisted_creators.insert(key, record);
            }
            StateUpdate::AuctionManager(key, record) => {
                self.auction_managers.insert(key, record);
            }
        }
    }

    /// Bids on `auction`, highest first, cancelled bids excluded. Equal bids
    /// order by newest timestamp, then by account key.
    pub fn bids_for_auction(&self, auction: &Pubkey) -> Vec<(Pubkey, BidderMetadata)> {
        let mut bids = self
            .bidder_metadata
            .iter()
            .filter(|(_, bid)| bid.auction_pubkey == *auction && !bid.cancelled)
            .map(|(key, bid)| (*key, bid.clone()))
            .collect::<Vec<_>>();
        bids.sort_by(|(a_key, a), (b_key, b)| {
            b.last_bid
                .cmp(&a.last_bid)
                .then(b.last_bid_timestamp.cmp(&a.last_bid_timestamp))
                .then(a_key.cmp(b_key))
        });
        bids
    }
}

pub struct MetaStore;

impl MetaStore {
    pub fn new() -> (StoreWriter, StoreReader) {
        let state = Arc::new(RwLock::new(MetaState::default()));
        (
            StoreWriter {
                state: Arc::clone(&state),
            },
            StoreReader { state },
        )
    }
}

pub struct StoreWriter {
    state: Arc<RwLock<MetaState>>,
}

impl StoreWriter {
    pub fn merge(&mut self, update: StateUpdate) {
        self.state.write().apply(update);
    }
}

#[derive(Clone)]
pub struct StoreReader {
    state: Arc<RwLock<MetaState>>,
}

impl StoreReader {
    pub fn snapshot(&self) -> MetaState {
        self.state.read().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&MetaState) -> R) -> R {
        f(&self.state.read())
    }
}
