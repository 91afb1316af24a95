//! Settlement assembly: decommission an auction manager and hand auction
//! and vault authority back to it. Unwinding the vault and redeeming prizes
//! is left to the caller.

use async_trait::async_trait;
use log::info;
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_sdk::signature::Signature;

use crate::{
    config::ProgramIds,
    error::{LensError, LensResult},
    instruction::{decommission_auction_manager, set_auction_authority, set_vault_authority},
    state::AuctionManagerStatus,
    store::MetaState,
};

/// Signing and submission capability of a connected wallet.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// `None` while disconnected.
    fn public_key(&self) -> Option<Pubkey>;

    /// Signs and sends each batch as one transaction, in order.
    async fn send_transactions(&self, batches: Vec<Vec<Instruction>>) -> LensResult<Vec<Signature>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementTarget {
    pub auction_manager: Pubkey,
    pub status: AuctionManagerStatus,
    pub store: Pubkey,
    pub auction: Pubkey,
    pub auction_authority: Pubkey,
    pub vault: Pubkey,
    pub vault_authority: Pubkey,
}

impl SettlementTarget {
    /// Joins the manager with its auction and vault; `None` until all three
    /// have been projected.
    pub fn from_state(state: &MetaState, auction_manager: &Pubkey) -> Option<Self> {
        let manager = state.auction_managers.get(auction_manager)?;
        let auction = state.auctions.get(&manager.auction)?;
        let vault = state.vaults.get(&manager.vault)?;
        Some(Self {
            auction_manager: *auction_manager,
            status: manager.state.status,
            store: manager.store,
            auction: manager.auction,
            auction_authority: auction.authority,
            vault: manager.vault,
            vault_authority: vault.authority,
        })
    }
}

pub fn plan_decommission(
    target: &SettlementTarget,
    wallet_key: &Pubkey,
    programs: &ProgramIds,
) -> Vec<Vec<Instruction>> {
    if target.status != AuctionManagerStatus::Initialized {
        return Vec::new();
    }

    let mut batch = Vec::with_capacity(3);
    if target.auction_authority == *wallet_key {
        batch.push(set_auction_authority(
            &programs.auction,
            &target.auction,
            wallet_key,
            &target.auction_manager,
        ));
    }
    if target.vault_authority == *wallet_key {
        batch.push(set_vault_authority(
            &programs.vault,
            &target.vault,
            wallet_key,
            &target.auction_manager,
        ));
    }
    batch.push(decommission_auction_manager(
        &programs.metaplex,
        &target.auction_manager,
        &target.auction,
        wallet_key,
        &target.vault,
        &target.store,
        &programs.auction,
    ));
    vec![batch]
}

/// Sends the decommission plan for `target`, signed by `wallet`.
///
/// Only the authority hand-off and the decommission itself are sent; the
/// vault stays locked until the caller unwinds it.
pub async fn decommission_auction_manager_for_wallet<W>(
    wallet: &W,
    target: &SettlementTarget,
    programs: &ProgramIds,
) -> LensResult<Vec<Signature>>
where
    W: Wallet + ?Sized,
{
    let wallet_key = wallet.public_key().ok_or(LensError::WalletNotConnected)?;
    if let Some(store) = programs.store {
        if store != target.store {
            return Err(LensError::Config(format!(
                "auction manager {} belongs to store {}, not {}",
                target.auction_manager, target.store, store
            )));
        }
    }

    let batches = plan_decommission(target, &wallet_key, programs);
    let signatures = wallet.send_transactions(batches).await?;
    info!(
        "event=decommission module=settlement status=ok auction_manager={} transactions={}",
        target.auction_manager,
        signatures.len()
    );
    Ok(signatures)
}
