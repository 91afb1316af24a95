//! Live projection of program-account notifications into keyed records.
//!
//! All watched streams are multiplexed onto one task, so the merge callback
//! is never called concurrently with itself. Within a stream, updates are
//! merged in arrival order; across streams no order is promised.
//!
//! Teardown: once `Subscription::unsubscribe` returns, the callback is not
//! called again. Notifications still queued at that point are suppressed. A
//! merge already running when teardown starts completes first. Dropping the
//! handle also tears down, without waiting.

use futures::{stream, StreamExt};
use log::{debug, error, info, warn};
use solana_program::pubkey::Pubkey;
use tokio::{sync::oneshot, task::JoinHandle};

use crate::{
    config::ProgramIds,
    decode::{decode_auction_account, decode_metaplex_account, decode_vault_account, DecodeFn},
    error::{LensError, LensResult},
    rpc::{AccountChangeStream, KeyedAccount, RpcConnection},
    store::{StateUpdate, StoreWriter},
};

#[derive(Clone, Copy)]
pub struct WatchSpec {
    pub program_id: Pubkey,
    pub decode: DecodeFn,
}

impl WatchSpec {
    pub fn new(program_id: Pubkey, decode: DecodeFn) -> Self {
        Self { program_id, decode }
    }
}

/// Auction, metaplex and vault watches, as an auction page needs them.
pub fn standard_watches(ids: &ProgramIds) -> Vec<WatchSpec> {
    vec![
        WatchSpec::new(ids.auction, decode_auction_account),
        WatchSpec::new(ids.metaplex, decode_metaplex_account),
        WatchSpec::new(ids.vault, decode_vault_account),
    ]
}

pub struct Subscription {
    programs: Vec<Pubkey>,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Programs whose streams were opened.
    pub fn programs(&self) -> &[Pubkey] {
        &self.programs
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().map_or(false, |task| !task.is_finished())
    }

    pub async fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!(
                    "event=projector_stop module=projector status=failed error={}",
                    err
                );
            }
        }
        info!(
            "event=unsubscribe module=projector status=ok programs={}",
            self.programs.len()
        );
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

/// Opens one notification stream per watch and feeds decoded updates to `merge`.
///
/// A watch whose stream fails to open is logged and left out; this fails only
/// when no stream opens at all.
pub async fn subscribe<C, F>(
    connection: &C,
    merge: F,
    watches: Vec<WatchSpec>,
) -> LensResult<Subscription>
where
    C: RpcConnection + ?Sized,
    F: FnMut(StateUpdate) + Send + 'static,
{
    let opened = open_streams(connection, watches).await?;
    Ok(start_projection(opened, merge))
}

/// Scans every account each watched program currently owns and merges the
/// decoded records, one `merge` call per record.
///
/// A failed scan is logged and the remaining watches are still loaded.
/// Returns the number of records merged.
pub async fn load_accounts<C, F>(connection: &C, merge: &mut F, watches: &[WatchSpec]) -> usize
where
    C: RpcConnection + ?Sized,
    F: FnMut(StateUpdate),
{
    let mut merged = 0;
    for watch in watches {
        let accounts = match connection.program_accounts(&watch.program_id, &[]).await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(
                    "event=load module=projector status=failed program={} error={}",
                    watch.program_id, err
                );
                continue;
            }
        };
        let scanned = accounts.len();
        for account in accounts {
            if project(watch, account, merge) {
                merged += 1;
            }
        }
        debug!(
            "event=load module=projector status=ok program={} scanned={}",
            watch.program_id, scanned
        );
    }
    merged
}

/// Loads existing accounts into the store, then keeps it current.
///
/// Streams are opened before the load, so changes landing during the scan
/// queue up and are merged after the loaded records.
pub async fn subscribe_store<C>(
    connection: &C,
    mut writer: StoreWriter,
    watches: Vec<WatchSpec>,
) -> LensResult<Subscription>
where
    C: RpcConnection + ?Sized,
{
    let opened = open_streams(connection, watches).await?;
    let loaded_watches = opened.iter().map(|(watch, _)| *watch).collect::<Vec<_>>();
    let mut merge = move |update| writer.merge(update);
    let loaded = load_accounts(connection, &mut merge, &loaded_watches).await;
    info!(
        "event=preload module=projector status=ok programs={} records={}",
        loaded_watches.len(),
        loaded
    );
    Ok(start_projection(opened, merge))
}

async fn open_streams<C>(
    connection: &C,
    watches: Vec<WatchSpec>,
) -> LensResult<Vec<(WatchSpec, AccountChangeStream)>>
where
    C: RpcConnection + ?Sized,
{
    let mut opened = Vec::with_capacity(watches.len());
    let mut last_error = None;
    for watch in watches {
        match connection.subscribe_program(&watch.program_id).await {
            Ok(notifications) => {
                debug!(
                    "event=subscribe module=projector status=ok program={}",
                    watch.program_id
                );
                opened.push((watch, notifications));
            }
            Err(err) => {
                warn!(
                    "event=subscribe module=projector status=failed program={} error={}",
                    watch.program_id, err
                );
                last_error = Some(err);
            }
        }
    }

    if opened.is_empty() {
        return Err(last_error.unwrap_or_else(|| {
            LensError::Subscription {
                program_id: Pubkey::default(),
                reason: "no watches given".to_string(),
            }
        }));
    }
    Ok(opened)
}

fn start_projection<F>(opened: Vec<(WatchSpec, AccountChangeStream)>, mut merge: F) -> Subscription
where
    F: FnMut(StateUpdate) + Send + 'static,
{
    let programs = opened.iter().map(|(watch, _)| watch.program_id).collect();
    let mut notifications = stream::select_all(opened.into_iter().map(|(watch, notifications)| {
        notifications
            .map(move |account| (watch, account))
            .boxed()
    }));
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = &mut cancel_rx => break,
                next = notifications.next() => match next {
                    Some((watch, account)) => {
                        project(&watch, account, &mut merge);
                    }
                    None => {
                        warn!("event=projector_idle module=projector reason=all_streams_closed");
                        break;
                    }
                },
            }
        }
    });

    Subscription {
        programs,
        cancel: Some(cancel_tx),
        task: Some(task),
    }
}

/// Decodes one account and merges it; `true` when a record was merged.
fn project<F>(watch: &WatchSpec, account: KeyedAccount, merge: &mut F) -> bool
where
    F: FnMut(StateUpdate),
{
    match (watch.decode)(&account.address, &account.data) {
        Ok(Some(update)) => {
            merge(update);
            return true;
        }
        Ok(None) => debug!(
            "event=notification_skipped module=projector program={} account={} reason=untracked_kind",
            watch.program_id, account.address
        ),
        Err(err) => warn!(
            "event=decode module=projector status=failed program={} account={} error={}",
            watch.program_id,
            account.address,
            LensError::decode(account.address, err)
        ),
    }
    false
}
