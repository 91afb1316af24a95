//! Per-program account decoders.
//!
//! Decoders are pure: the same bytes always give the same result. Accounts of
//! a kind the store does not track yield `Ok(None)`; bytes that claim a known
//! kind but fail to parse yield `DecodeError`.

use solana_program::pubkey::Pubkey;

use crate::{
    error::DecodeError,
    state::{
        metaplex_key, vault_key, AccountRecord, AuctionData, AuctionDataExtended, AuctionManager,
        BidderMetadata, BidderPot, ExternalPriceAccount, SafetyDepositBox, Store, Vault,
        WhitelistedCreator, AUCTION_DATA_EXTENDED_LEN, BIDDER_METADATA_LEN, BIDDER_POT_LEN,
    },
    store::StateUpdate,
};

pub type DecodeFn = fn(&Pubkey, &[u8]) -> Result<Option<StateUpdate>, DecodeError>;

/// Auction program accounts carry no key byte; fixed-size records are told
/// apart by length and everything else must be `AuctionData`.
pub fn decode_auction_account(
    address: &Pubkey,
    data: &[u8],
) -> Result<Option<StateUpdate>, DecodeError> {
    let update = match data.len() {
        BIDDER_METADATA_LEN => StateUpdate::BidderMetadata(*address, BidderMetadata::decode(data)?),
        BIDDER_POT_LEN => StateUpdate::BidderPot(*address, BidderPot::decode(data)?),
        AUCTION_DATA_EXTENDED_LEN => {
            StateUpdate::AuctionDataExtended(*address, AuctionDataExtended::decode(data)?)
        }
        _ => StateUpdate::Auction(*address, AuctionData::decode(data)?),
    };
    Ok(Some(update))
}

pub fn decode_vault_account(
    address: &Pubkey,
    data: &[u8],
) -> Result<Option<StateUpdate>, DecodeError> {
    let Some(key) = data.first() else {
        return Err(DecodeError::UnexpectedLength {
            expected: 1,
            actual: 0,
        });
    };
    let update = match *key {
        vault_key::VAULT_V1 => StateUpdate::Vault(*address, Vault::decode(data)?),
        vault_key::SAFETY_DEPOSIT_BOX_V1 => {
            StateUpdate::SafetyDepositBox(*address, SafetyDepositBox::decode(data)?)
        }
        vault_key::EXTERNAL_PRICE_ACCOUNT_V1 => {
            StateUpdate::ExternalPriceAccount(*address, ExternalPriceAccount::decode(data)?)
        }
        _ => return Ok(None),
    };
    Ok(Some(update))
}

pub fn decode_metaplex_account(
    address: &Pubkey,
    data: &[u8],
) -> Result<Option<StateUpdate>, DecodeError> {
    let Some(key) = data.first() else {
        return Err(DecodeError::UnexpectedLength {
            expected: 1,
            actual: 0,
        });
    };
    let update = match *key {
        metaplex_key::STORE_V1 => StateUpdate::Store(*address, Store::decode(data)?),
        metaplex_key::WHITELISTED_CREATOR_V1 => {
            StateUpdate::WhitelistedCreator(*address, WhitelistedCreator::decode(data)?)
        }
        metaplex_key::AUCTION_MANAGER_V2 => {
            StateUpdate::AuctionManager(*address, AuctionManager::decode(data)?)
        }
        _ => return Ok(None),
    };
    Ok(Some(update))
}
