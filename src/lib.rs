//! Handle resolution and live auction state for Solana NFT storefronts.

pub mod config;
pub mod decode;
pub mod error;
pub mod instruction;
pub mod logging;
pub mod name_service;
pub mod projector;
pub mod resolver;
pub mod rpc;
pub mod settlement;
pub mod solana_rpc;
pub mod state;
pub mod store;
pub mod validation;

pub use config::{LensConfig, NameServiceIds, ProgramIds};
pub use error::{DecodeError, LensError, LensResult};
pub use logging::{default_log_level, init_logging};
pub use name_service::{NameLookup, SplNameService};
pub use projector::{
    load_accounts, standard_watches, subscribe, subscribe_store, Subscription, WatchSpec,
};
pub use resolver::HandleResolver;
pub use rpc::{AccountChangeStream, KeyedAccount, MemcmpFilter, RpcConnection};
pub use settlement::{
    decommission_auction_manager_for_wallet, plan_decommission, SettlementTarget, Wallet,
};
pub use solana_rpc::SolanaRpc;
pub use store::{MetaState, MetaStore, StateUpdate, StoreReader, StoreWriter};
