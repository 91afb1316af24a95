use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    nonblocking::{pubsub_client::PubsubClient, rpc_client::RpcClient},
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
    rpc_response::RpcKeyedAccount,
};
use solana_program::pubkey::Pubkey;
use solana_sdk::{account::Account, commitment_config::CommitmentConfig};
use tokio::sync::{mpsc, oneshot};

use crate::{
    config::LensConfig,
    error::{LensError, LensResult},
    rpc::{AccountChangeStream, KeyedAccount, MemcmpFilter, RpcConnection},
};

/// `RpcConnection` backed by a JSON-RPC client and a websocket pubsub client.
pub struct SolanaRpc {
    rpc: RpcClient,
    pubsub: Arc<PubsubClient>,
    commitment: CommitmentConfig,
}

impl SolanaRpc {
    pub async fn connect(config: &LensConfig) -> LensResult<Self> {
        let commitment = config.commitment_config()?;
        let pubsub = PubsubClient::new(&config.ws_url)
            .await
            .map_err(|err| LensError::Transport(err.to_string()))?;
        debug!(
            "event=rpc_connect module=solana_rpc status=ok rpc_url={} ws_url={}",
            config.rpc_url, config.ws_url
        );
        Ok(Self {
            rpc: RpcClient::new_with_commitment(config.rpc_url.clone(), commitment),
            pubsub: Arc::new(pubsub),
            commitment,
        })
    }

    fn account_config(&self) -> RpcAccountInfoConfig {
        RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            commitment: Some(self.commitment),
            ..RpcAccountInfoConfig::default()
        }
    }

    fn program_accounts_config(&self, filters: &[MemcmpFilter]) -> RpcProgramAccountsConfig {
        let filters = filters
            .iter()
            .map(|filter| {
                RpcFilterType::Memcmp(Memcmp::new_base58_encoded(filter.offset, &filter.bytes))
            })
            .collect::<Vec<_>>();
        RpcProgramAccountsConfig {
            filters: (!filters.is_empty()).then_some(filters),
            account_config: self.account_config(),
            ..RpcProgramAccountsConfig::default()
        }
    }
}

fn keyed_from_notification(keyed: RpcKeyedAccount) -> Option<KeyedAccount> {
    let address = Pubkey::from_str(&keyed.pubkey).ok()?;
    let account: Account = keyed.account.decode()?;
    Some(KeyedAccount {
        address,
        data: account.data,
    })
}

#[async_trait]
impl RpcConnection for SolanaRpc {
    async fn account_data(&self, address: &Pubkey) -> LensResult<Option<Vec<u8>>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|err| LensError::Transport(err.to_string()))?;
        Ok(response.value.map(|account| account.data))
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> LensResult<Vec<KeyedAccount>> {
        let accounts = self
            .rpc
            .get_program_accounts_with_config(program_id, self.program_accounts_config(filters))
            .await
            .map_err(|err| LensError::Transport(err.to_string()))?;
        Ok(accounts
            .into_iter()
            .map(|(address, account)| KeyedAccount {
                address,
                data: account.data,
            })
            .collect())
    }

    async fn subscribe_program(&self, program_id: &Pubkey) -> LensResult<AccountChangeStream> {
        let pubsub = Arc::clone(&self.pubsub);
        let program_id = *program_id;
        let config = self.program_accounts_config(&[]);
        let (tx, mut rx) = mpsc::unbounded_channel::<KeyedAccount>();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), String>>();

        // The pubsub stream borrows the client, so it lives inside the forwarding task.
        tokio::spawn(async move {
            let (mut notifications, unsubscribe) =
                match pubsub.program_subscribe(&program_id, Some(config)).await {
                    Ok(pair) => pair,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err.to_string()));
                        return;
                    }
                };
            let _ = ready_tx.send(Ok(()));

            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    next = notifications.next() => match next {
                        Some(response) => match keyed_from_notification(response.value) {
                            Some(change) => {
                                if tx.send(change).is_err() {
                                    break;
                                }
                            }
                            None => warn!(
                                "event=notification_dropped module=solana_rpc program={} reason=undecodable_envelope",
                                program_id
                            ),
                        },
                        None => {
                            warn!(
                                "event=subscription_closed module=solana_rpc program={} reason=transport",
                                program_id
                            );
                            break;
                        }
                    }
                }
            }

            drop(notifications);
            unsubscribe().await;
            debug!(
                "event=unsubscribe module=solana_rpc status=ok program={}",
                program_id
            );
        });

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => return Err(LensError::Subscription { program_id, reason }),
            Err(_) => {
                return Err(LensError::Subscription {
                    program_id,
                    reason: "subscription task exited".to_string(),
                })
            }
        }

        let stream = futures::stream::poll_fn(move |cx| rx.poll_recv(cx));
        Ok(stream.boxed())
    }
}
