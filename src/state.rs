use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::DecodeError;

pub const BIDDER_METADATA_LEN: usize = 32 + 32 + 8 + 8 + 1;
pub const BIDDER_POT_LEN: usize = 32 + 32 + 32 + 1;
pub const AUCTION_DATA_EXTENDED_LEN: usize = 8 + 9 + 2 + 9 + 33 + 158;

/// Leading key byte of vault program accounts.
pub mod vault_key {
    pub const SAFETY_DEPOSIT_BOX_V1: u8 = 1;
    pub const EXTERNAL_PRICE_ACCOUNT_V1: u8 = 2;
    pub const VAULT_V1: u8 = 3;
}

/// Leading key byte of metaplex program accounts.
pub mod metaplex_key {
    pub const STORE_V1: u8 = 3;
    pub const WHITELISTED_CREATOR_V1: u8 = 4;
    pub const AUCTION_MANAGER_V2: u8 = 10;
}

/// Borsh-decoded program account. Trailing bytes past the record are
/// account padding and are ignored.
pub trait AccountRecord: BorshDeserialize + Sized {
    const KEY: Option<u8> = None;
    const LEN: Option<usize> = None;

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if let Some(expected) = Self::LEN {
            if data.len() != expected {
                return Err(DecodeError::UnexpectedLength {
                    expected,
                    actual: data.len(),
                });
            }
        }
        if let Some(key) = Self::KEY {
            match data.first() {
                Some(found) if *found == key => {}
                Some(found) => {
                    return Err(DecodeError::Malformed(format!(
                        "expected key {key}, found {found}"
                    )))
                }
                None => {
                    return Err(DecodeError::UnexpectedLength {
                        expected: 1,
                        actual: 0,
                    })
                }
            }
        }
        Ok(Self::deserialize(&mut &data[..])?)
    }
}

// Auction program

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionState {
    Created,
    Started,
    Ended,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum PriceFloor {
    None([u8; 32]),
    MinimumPrice([u8; 32]),
    BlindedPrice([u8; 32]),
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Bid(pub Pubkey, pub u64);

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum BidState {
    EnglishAuction { bids: Vec<Bid>, max: u64 },
    OpenEdition { bids: Vec<Bid>, max: u64 },
}

impl BidState {
    pub fn bids(&self) -> &[Bid] {
        match self {
            BidState::EnglishAuction { bids, .. } | BidState::OpenEdition { bids, .. } => bids,
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuctionData {
    pub authority: Pubkey,
    pub token_mint: Pubkey,
    pub last_bid: Option<i64>,
    pub ended_at: Option<i64>,
    pub end_auction_at: Option<i64>,
    pub end_auction_gap: Option<i64>,
    pub price_floor: PriceFloor,
    pub state: AuctionState,
    pub bid_state: BidState,
}

impl AccountRecord for AuctionData {}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuctionDataExtended {
    pub total_uncancelled_bids: u64,
    pub tick_size: Option<u64>,
    pub gap_tick_size_percentage: Option<u8>,
    pub instant_sale_price: Option<u64>,
    pub name: Option<[u8; 32]>,
}

impl AccountRecord for AuctionDataExtended {
    const LEN: Option<usize> = Some(AUCTION_DATA_EXTENDED_LEN);
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct BidderMetadata {
    pub bidder_pubkey: Pubkey,
    pub auction_pubkey: Pubkey,
    pub last_bid: u64,
    pub last_bid_timestamp: i64,
    pub cancelled: bool,
}

impl AccountRecord for BidderMetadata {
    const LEN: Option<usize> = Some(BIDDER_METADATA_LEN);
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct BidderPot {
    pub bidder_pot: Pubkey,
    pub bidder_act: Pubkey,
    pub auction_act: Pubkey,
    pub emptied: bool,
}

impl AccountRecord for BidderPot {
    const LEN: Option<usize> = Some(BIDDER_POT_LEN);
}

// Vault program

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    Inactive,
    Active,
    Combined,
    Deactivated,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    pub key: u8,
    pub token_program: Pubkey,
    pub fraction_mint: Pubkey,
    pub authority: Pubkey,
    pub fraction_treasury: Pubkey,
    pub redeem_treasury: Pubkey,
    pub allow_further_share_creation: bool,
    pub pricing_lookup_address: Pubkey,
    pub token_type_count: u8,
    pub state: VaultState,
    pub locked_price_per_share: u64,
}

impl AccountRecord for Vault {
    const KEY: Option<u8> = Some(vault_key::VAULT_V1);
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct SafetyDepositBox {
    pub key: u8,
    pub vault: Pubkey,
    pub token_mint: Pubkey,
    pub store: Pubkey,
    pub order: u8,
}

impl AccountRecord for SafetyDepositBox {
    const KEY: Option<u8> = Some(vault_key::SAFETY_DEPOSIT_BOX_V1);
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExternalPriceAccount {
    pub key: u8,
    pub price_per_share: u64,
    pub price_mint: Pubkey,
    pub allowed_to_combine: bool,
}

impl AccountRecord for ExternalPriceAccount {
    const KEY: Option<u8> = Some(vault_key::EXTERNAL_PRICE_ACCOUNT_V1);
}

// Metaplex program

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub key: u8,
    pub public: bool,
    pub auction_program: Pubkey,
    pub token_vault_program: Pubkey,
    pub token_metadata_program: Pubkey,
    pub token_program: Pubkey,
}

impl AccountRecord for Store {
    const KEY: Option<u8> = Some(metaplex_key::STORE_V1);
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct WhitelistedCreator {
    pub key: u8,
    pub address: Pubkey,
    pub activated: bool,
}

impl AccountRecord for WhitelistedCreator {
    const KEY: Option<u8> = Some(metaplex_key::WHITELISTED_CREATOR_V1);
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionManagerStatus {
    Initialized,
    Validated,
    Running,
    Disbursing,
    Finished,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuctionManagerStateV2 {
    pub status: AuctionManagerStatus,
    pub safety_config_items_validated: u64,
    pub bids_pushed_to_accept_payment: u64,
    pub has_participation: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuctionManager {
    pub key: u8,
    pub store: Pubkey,
    pub authority: Pubkey,
    pub auction: Pubkey,
    pub vault: Pubkey,
    pub accept_payment: Pubkey,
    pub state: AuctionManagerStateV2,
}

impl AccountRecord for AuctionManager {
    const KEY: Option<u8> = Some(metaplex_key::AUCTION_MANAGER_V2);
}
