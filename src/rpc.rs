use async_trait::async_trait;
use futures::stream::BoxStream;
use solana_program::pubkey::Pubkey;

use crate::error::LensResult;

/// Server-side filter: account bytes at `offset` must equal `bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcmpFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl MemcmpFilter {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        data.get(self.offset..self.offset + self.bytes.len())
            .map_or(false, |window| window == self.bytes.as_slice())
    }
}

/// A program account as returned by a scan or carried by a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedAccount {
    pub address: Pubkey,
    pub data: Vec<u8>,
}

/// Notifications for one program; ends when the transport drops.
/// Dropping the stream unsubscribes.
pub type AccountChangeStream = BoxStream<'static, KeyedAccount>;

/// The chain operations this crate consumes. Any SDK binding implements it;
/// the connection is shared read-only across all callers.
#[async_trait]
pub trait RpcConnection: Send + Sync {
    /// Raw data of `address`, or `None` if the account does not exist.
    async fn account_data(&self, address: &Pubkey) -> LensResult<Option<Vec<u8>>>;

    /// Accounts owned by `program_id` matching every filter, in server order.
    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> LensResult<Vec<KeyedAccount>>;

    async fn subscribe_program(&self, program_id: &Pubkey) -> LensResult<AccountChangeStream>;
}
