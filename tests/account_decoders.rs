use auction_lens::{
    decode::{decode_auction_account, decode_metaplex_account, decode_vault_account},
    error::DecodeError,
    state::{
        AuctionDataExtended, AuctionManager, AuctionManagerStateV2, AuctionManagerStatus,
        BidderPot, SafetyDepositBox, Store, WhitelistedCreator, AUCTION_DATA_EXTENDED_LEN,
        BIDDER_POT_LEN,
    },
    store::StateUpdate,
};
use borsh::BorshSerialize;
use solana_program::pubkey::Pubkey;

fn manager(status: AuctionManagerStatus) -> AuctionManager {
    AuctionManager {
        key: 10,
        store: Pubkey::new_unique(),
        authority: Pubkey::new_unique(),
        auction: Pubkey::new_unique(),
        vault: Pubkey::new_unique(),
        accept_payment: Pubkey::new_unique(),
        state: AuctionManagerStateV2 {
            status,
            safety_config_items_validated: 2,
            bids_pushed_to_accept_payment: 0,
            has_participation: false,
        },
    }
}

#[test]
fn test_auction_extended_record_is_padded_to_fixed_size() {
    let address = Pubkey::new_unique();
    let record = AuctionDataExtended {
        total_uncancelled_bids: 4,
        tick_size: Some(100),
        gap_tick_size_percentage: None,
        instant_sale_price: Some(5_000),
        name: None,
    };
    let mut data = record.try_to_vec().unwrap();
    data.resize(AUCTION_DATA_EXTENDED_LEN, 0);

    let update = decode_auction_account(&address, &data).unwrap();
    assert_eq!(update, Some(StateUpdate::AuctionDataExtended(address, record)));
}

#[test]
fn test_bidder_pot_decoded_by_length() {
    let address = Pubkey::new_unique();
    let pot = BidderPot {
        bidder_pot: Pubkey::new_unique(),
        bidder_act: Pubkey::new_unique(),
        auction_act: Pubkey::new_unique(),
        emptied: true,
    };
    let data = pot.try_to_vec().unwrap();
    assert_eq!(data.len(), BIDDER_POT_LEN);

    let update = decode_auction_account(&address, &data).unwrap();
    assert_eq!(update, Some(StateUpdate::BidderPot(address, pot)));
}

#[test]
fn test_auction_garbage_is_decode_error() {
    let address = Pubkey::new_unique();
    assert!(decode_auction_account(&address, &[]).is_err());
    assert!(decode_auction_account(&address, &[7u8; 40]).is_err());
}

#[test]
fn test_decoders_are_deterministic() {
    let address = Pubkey::new_unique();
    let data = manager(AuctionManagerStatus::Running).try_to_vec().unwrap();
    assert_eq!(
        decode_metaplex_account(&address, &data).unwrap(),
        decode_metaplex_account(&address, &data).unwrap()
    );
}

#[test]
fn test_metaplex_known_keys() {
    let address = Pubkey::new_unique();
    let record = manager(AuctionManagerStatus::Initialized);
    let mut data = record.try_to_vec().unwrap();
    data.extend_from_slice(&[0u8; 64]);
    assert_eq!(
        decode_metaplex_account(&address, &data).unwrap(),
        Some(StateUpdate::AuctionManager(address, record))
    );

    let store = Store {
        key: 3,
        public: true,
        auction_program: Pubkey::new_unique(),
        token_vault_program: Pubkey::new_unique(),
        token_metadata_program: Pubkey::new_unique(),
        token_program: Pubkey::new_unique(),
    };
    let update = decode_metaplex_account(&address, &store.try_to_vec().unwrap()).unwrap();
    assert_eq!(update, Some(StateUpdate::Store(address, store)));

    let creator = WhitelistedCreator {
        key: 4,
        address: Pubkey::new_unique(),
        activated: true,
    };
    let update = decode_metaplex_account(&address, &creator.try_to_vec().unwrap()).unwrap();
    assert_eq!(update, Some(StateUpdate::WhitelistedCreator(address, creator)));
}

#[test]
fn test_metaplex_unknown_key_is_untracked() {
    let address = Pubkey::new_unique();
    assert_eq!(decode_metaplex_account(&address, &[2u8; 64]).unwrap(), None);
    assert_eq!(decode_metaplex_account(&address, &[7u8; 64]).unwrap(), None);
    assert!(matches!(
        decode_metaplex_account(&address, &[]),
        Err(DecodeError::UnexpectedLength { .. })
    ));
}

#[test]
fn test_metaplex_truncated_manager_is_error() {
    let address = Pubkey::new_unique();
    let mut data = manager(AuctionManagerStatus::Running).try_to_vec().unwrap();
    data.truncate(50);
    assert!(decode_metaplex_account(&address, &data).is_err());
}

#[test]
fn test_vault_safety_deposit_box() {
    let address = Pubkey::new_unique();
    let record = SafetyDepositBox {
        key: 1,
        vault: Pubkey::new_unique(),
        token_mint: Pubkey::new_unique(),
        store: Pubkey::new_unique(),
        order: 0,
    };
    let update = decode_vault_account(&address, &record.try_to_vec().unwrap()).unwrap();
    assert_eq!(update, Some(StateUpdate::SafetyDepositBox(address, record)));
    assert_eq!(decode_vault_account(&address, &[0u8; 16]).unwrap(), None);
}
