//! SPL name-service account layouts and the lookups built on them.
//!
//! Every name account starts with a 96 byte header (parent, owner, class);
//! the payload follows. Account addresses are program-derived from
//! `sha256(HASH_PREFIX ++ name)` plus the class and parent keys.

use std::sync::Arc;

use async_trait::async_trait;
use borsh::{BorshDeserialize, BorshSerialize};
use log::debug;
use solana_program::{hash::hashv, pubkey::Pubkey};

use crate::{
    config::NameServiceIds,
    error::{DecodeError, LensError, LensResult},
    rpc::{MemcmpFilter, RpcConnection},
};

pub const HASH_PREFIX: &str = "SPL Name Service";
pub const NAME_HEADER_LEN: usize = 96;
/// Byte offset of the owner key inside the header.
pub const OWNER_OFFSET: usize = 32;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct NameRecordHeader {
    pub parent_name: Pubkey,
    pub owner: Pubkey,
    pub class: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReverseTwitterRecord {
    pub twitter_registry_key: Pubkey,
    pub twitter_handle: String,
}

pub fn hashed_name(name: &str) -> [u8; 32] {
    hashv(&[HASH_PREFIX.as_bytes(), name.as_bytes()]).to_bytes()
}

pub fn name_account_key(
    hashed_name: &[u8; 32],
    class: Option<&Pubkey>,
    parent: Option<&Pubkey>,
    program_id: &Pubkey,
) -> Pubkey {
    let zero = [0u8; 32];
    let class_seed = class.map_or(zero, |key| key.to_bytes());
    let parent_seed = parent.map_or(zero, |key| key.to_bytes());
    let (key, _bump) =
        Pubkey::find_program_address(&[&hashed_name[..], &class_seed, &parent_seed], program_id);
    key
}

/// Splits a name account into its header and payload.
pub fn split_name_record(data: &[u8]) -> Result<(NameRecordHeader, &[u8]), DecodeError> {
    if data.len() < NAME_HEADER_LEN {
        return Err(DecodeError::UnexpectedLength {
            expected: NAME_HEADER_LEN,
            actual: data.len(),
        });
    }
    let header = NameRecordHeader::try_from_slice(&data[..NAME_HEADER_LEN])?;
    Ok((header, &data[NAME_HEADER_LEN..]))
}

pub fn decode_reverse_twitter(payload: &[u8]) -> Result<ReverseTwitterRecord, DecodeError> {
    Ok(ReverseTwitterRecord::deserialize(&mut &payload[..])?)
}

/// Payload of a reverse-lookup record: u32 LE length, then the name bytes.
pub fn decode_reverse_name(payload: &[u8]) -> Result<String, DecodeError> {
    let prefix: [u8; 4] = payload
        .get(..4)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecodeError::UnexpectedLength {
            expected: 4,
            actual: payload.len(),
        })?;
    let len = u32::from_le_bytes(prefix) as usize;
    let end = 4usize.checked_add(len).ok_or(DecodeError::UnexpectedLength {
        expected: usize::MAX,
        actual: payload.len(),
    })?;
    let name = payload
        .get(4..end)
        .ok_or(DecodeError::UnexpectedLength {
            expected: end,
            actual: payload.len(),
        })?;
    String::from_utf8(name.to_vec()).map_err(|err| DecodeError::Malformed(err.to_string()))
}

/// Name-service queries consumed by the handle resolver.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Twitter handle and registry key verified for `address`.
    async fn handle_and_registry_key(&self, address: &Pubkey)
        -> LensResult<Option<(String, Pubkey)>>;

    /// Name accounts whose owner field equals `owner`, in server order.
    async fn owned_name_accounts(&self, owner: &Pubkey) -> LensResult<Vec<Pubkey>>;

    /// Domain name recorded for `name_account` in the reverse-lookup class.
    async fn reverse_lookup(&self, name_account: &Pubkey) -> LensResult<Option<String>>;
}

pub struct SplNameService<C: RpcConnection + ?Sized> {
    connection: Arc<C>,
    ids: NameServiceIds,
}

impl<C: RpcConnection + ?Sized> SplNameService<C> {
    pub fn new(connection: Arc<C>, ids: NameServiceIds) -> Self {
        Self { connection, ids }
    }

    pub fn twitter_reverse_key(&self, address: &Pubkey) -> Pubkey {
        name_account_key(
            &hashed_name(&address.to_string()),
            Some(&self.ids.twitter_verification_authority),
            Some(&self.ids.twitter_root_parent),
            &self.ids.program,
        )
    }

    pub fn reverse_lookup_key(&self, name_account: &Pubkey) -> Pubkey {
        name_account_key(
            &hashed_name(&name_account.to_string()),
            Some(&self.ids.reverse_lookup_class),
            None,
            &self.ids.program,
        )
    }
}

#[async_trait]
impl<C: RpcConnection + ?Sized> NameLookup for SplNameService<C> {
    async fn handle_and_registry_key(
        &self,
        address: &Pubkey,
    ) -> LensResult<Option<(String, Pubkey)>> {
        let key = self.twitter_reverse_key(address);
        let Some(data) = self.connection.account_data(&key).await? else {
            return Ok(None);
        };
        let (_, payload) = split_name_record(&data).map_err(|err| LensError::decode(key, err))?;
        let record = decode_reverse_twitter(payload).map_err(|err| LensError::decode(key, err))?;
        Ok(Some((record.twitter_handle, record.twitter_registry_key)))
    }

    async fn owned_name_accounts(&self, owner: &Pubkey) -> LensResult<Vec<Pubkey>> {
        let filter = MemcmpFilter::new(OWNER_OFFSET, owner.to_bytes());
        let accounts = self
            .connection
            .program_accounts(&self.ids.program, &[filter])
            .await?;
        debug!(
            "event=name_scan module=name_service owner={} candidates={}",
            owner,
            accounts.len()
        );
        Ok(accounts.into_iter().map(|account| account.address).collect())
    }

    async fn reverse_lookup(&self, name_account: &Pubkey) -> LensResult<Option<String>> {
        let key = self.reverse_lookup_key(name_account);
        let Some(data) = self.connection.account_data(&key).await? else {
            return Ok(None);
        };
        let (_, payload) = split_name_record(&data).map_err(|err| LensError::decode(key, err))?;
        let name = decode_reverse_name(payload).map_err(|err| LensError::decode(key, err))?;
        Ok(Some(name))
    }
}
