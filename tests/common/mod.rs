#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use auction_lens::{
    error::{LensError, LensResult},
    name_service::NameLookup,
    rpc::{AccountChangeStream, KeyedAccount, MemcmpFilter, RpcConnection},
    settlement::Wallet,
};
use futures::{channel::mpsc, StreamExt};
use parking_lot::Mutex;
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_sdk::signature::Signature;

/// In-memory chain: plain accounts, per-program account lists and one
/// notification channel per subscribed program.
#[derive(Default)]
pub struct MockConnection {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    failing: Mutex<HashSet<Pubkey>>,
    program_accounts: Mutex<HashMap<Pubkey, Vec<KeyedAccount>>>,
    scan_fails: Mutex<bool>,
    refuse_subscribe: Mutex<HashSet<Pubkey>>,
    senders: Mutex<HashMap<Pubkey, mpsc::UnboundedSender<KeyedAccount>>>,
    pub account_data_calls: AtomicUsize,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().insert(address, data);
    }

    pub fn fail_account(&self, address: Pubkey) {
        self.failing.lock().insert(address);
    }

    pub fn add_program_account(&self, program_id: Pubkey, address: Pubkey, data: Vec<u8>) {
        self.program_accounts
            .lock()
            .entry(program_id)
            .or_default()
            .push(KeyedAccount { address, data });
    }

    pub fn fail_scans(&self) {
        *self.scan_fails.lock() = true;
    }

    pub fn refuse_subscription(&self, program_id: Pubkey) {
        self.refuse_subscribe.lock().insert(program_id);
    }

    /// Pushes a notification; `false` once the subscriber is gone.
    pub fn notify(&self, program_id: &Pubkey, address: Pubkey, data: Vec<u8>) -> bool {
        match self.senders.lock().get(program_id) {
            Some(sender) => sender
                .unbounded_send(KeyedAccount { address, data })
                .is_ok(),
            None => false,
        }
    }

    pub fn account_data_calls(&self) -> usize {
        self.account_data_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcConnection for MockConnection {
    async fn account_data(&self, address: &Pubkey) -> LensResult<Option<Vec<u8>>> {
        self.account_data_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(address) {
            return Err(LensError::Transport(format!("connection reset for {address}")));
        }
        Ok(self.accounts.lock().get(address).cloned())
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> LensResult<Vec<KeyedAccount>> {
        if *self.scan_fails.lock() {
            return Err(LensError::Transport("scan timed out".to_string()));
        }
        Ok(self
            .program_accounts
            .lock()
            .get(program_id)
            .map(|accounts| {
                accounts
                    .iter()
                    .filter(|account| filters.iter().all(|filter| filter.matches(&account.data)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn subscribe_program(&self, program_id: &Pubkey) -> LensResult<AccountChangeStream> {
        if self.refuse_subscribe.lock().contains(program_id) {
            return Err(LensError::Subscription {
                program_id: *program_id,
                reason: "refused".to_string(),
            });
        }
        let (tx, rx) = mpsc::unbounded();
        self.senders.lock().insert(*program_id, tx);
        Ok(rx.boxed())
    }
}

/// Name lookups answered from fixed tables, recording reverse-lookup calls.
#[derive(Default)]
pub struct ScriptedLookup {
    pub twitter: HashMap<Pubkey, LensResult<Option<(String, Pubkey)>>>,
    pub owned: HashMap<Pubkey, LensResult<Vec<Pubkey>>>,
    pub reverse: HashMap<Pubkey, LensResult<Option<String>>>,
    pub reverse_calls: Mutex<Vec<Pubkey>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedLookup {
    pub fn reverse_calls(&self) -> Vec<Pubkey> {
        self.reverse_calls.lock().clone()
    }
}

#[async_trait]
impl NameLookup for ScriptedLookup {
    async fn handle_and_registry_key(
        &self,
        address: &Pubkey,
    ) -> LensResult<Option<(String, Pubkey)>> {
        self.twitter.get(address).cloned().unwrap_or(Ok(None))
    }

    async fn owned_name_accounts(&self, owner: &Pubkey) -> LensResult<Vec<Pubkey>> {
        self.owned.get(owner).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn reverse_lookup(&self, name_account: &Pubkey) -> LensResult<Option<String>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.reverse_calls.lock().push(*name_account);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.reverse
            .get(name_account)
            .cloned()
            .unwrap_or(Ok(None))
    }
}

pub struct MockWallet {
    pub key: Option<Pubkey>,
    pub sent: Mutex<Vec<Vec<Instruction>>>,
}

impl MockWallet {
    pub fn connected(key: Pubkey) -> Self {
        Self {
            key: Some(key),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            key: None,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Wallet for MockWallet {
    fn public_key(&self) -> Option<Pubkey> {
        self.key
    }

    async fn send_transactions(&self, batches: Vec<Vec<Instruction>>) -> LensResult<Vec<Signature>> {
        let signatures = batches.iter().map(|_| Signature::new_unique()).collect();
        self.sent.lock().extend(batches);
        Ok(signatures)
    }
}

/// Polls `check` until it holds or about a second has passed.
pub async fn eventually<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

pub fn shared<T>(value: T) -> Arc<Mutex<T>> {
    Arc::new(Mutex::new(value))
}
