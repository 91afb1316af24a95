//! Client configuration: endpoints, commitment and the program identifiers
//! the resolver and projector talk to.
//!
//! Defaults point at mainnet-beta. `from_env` layers overrides on top of the
//! defaults; `from_json_str` reads a full or partial document.

use std::str::FromStr;

use serde::Deserialize;
use solana_program::{pubkey, pubkey::Pubkey};
use solana_sdk::commitment_config::CommitmentConfig;

use crate::{error::LensError, validation::parse_address};

pub const ENV_RPC_URL: &str = "AUCTION_LENS_RPC_URL";
pub const ENV_WS_URL: &str = "AUCTION_LENS_WS_URL";
pub const ENV_COMMITMENT: &str = "AUCTION_LENS_COMMITMENT";
pub const ENV_STORE: &str = "AUCTION_LENS_STORE";

pub const AUCTION_PROGRAM_ID: Pubkey = pubkey!("auctxRXPeJoc4817jDhf4HbjnhEcr1cCXenosMhK5R8");
pub const METAPLEX_PROGRAM_ID: Pubkey = pubkey!("p1exdMJcjVao65QdewkaZRUnU6VPSXhus9n2GzWfh98");
pub const VAULT_PROGRAM_ID: Pubkey = pubkey!("vau1zxA2LbssAUEF7Gpw91zMM1LvXrvpzJtmZ58rPsn");

pub const NAME_PROGRAM_ID: Pubkey = pubkey!("namesLPneVptA9Z5rqUDD9tMTWEJwofgaYwp8cawRkX");
pub const TWITTER_VERIFICATION_AUTHORITY: Pubkey =
    pubkey!("FvPH7PrVrLGKPfqaf3xJodFTjZriqrAXXLTVWEorTFBi");
pub const TWITTER_ROOT_PARENT_REGISTRY: Pubkey =
    pubkey!("4YcexoW3r78zz16J2aqmukBLRwGq6rAvWzJpkYAXqebv");
pub const REVERSE_LOOKUP_CLASS: Pubkey = pubkey!("33m47vH6Eav6jr5Ry86XjhRft2jRBLDnDgPSHoquXi2Z");

const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
const DEFAULT_WS_URL: &str = "wss://api.mainnet-beta.solana.com";
const DEFAULT_COMMITMENT: &str = "confirmed";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgramIds {
    #[serde(with = "serde_address")]
    pub auction: Pubkey,
    #[serde(with = "serde_address")]
    pub metaplex: Pubkey,
    #[serde(with = "serde_address")]
    pub vault: Pubkey,
    /// Storefront owned by the operator; required for settlement.
    #[serde(with = "serde_address::option")]
    pub store: Option<Pubkey>,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            auction: AUCTION_PROGRAM_ID,
            metaplex: METAPLEX_PROGRAM_ID,
            vault: VAULT_PROGRAM_ID,
            store: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NameServiceIds {
    #[serde(with = "serde_address")]
    pub program: Pubkey,
    #[serde(with = "serde_address")]
    pub twitter_verification_authority: Pubkey,
    #[serde(with = "serde_address")]
    pub twitter_root_parent: Pubkey,
    #[serde(with = "serde_address")]
    pub reverse_lookup_class: Pubkey,
}

impl Default for NameServiceIds {
    fn default() -> Self {
        Self {
            program: NAME_PROGRAM_ID,
            twitter_verification_authority: TWITTER_VERIFICATION_AUTHORITY,
            twitter_root_parent: TWITTER_ROOT_PARENT_REGISTRY,
            reverse_lookup_class: REVERSE_LOOKUP_CLASS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub rpc_url: String,
    pub ws_url: String,
    pub commitment: String,
    pub programs: ProgramIds,
    pub name_service: NameServiceIds,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            commitment: DEFAULT_COMMITMENT.to_string(),
            programs: ProgramIds::default(),
            name_service: NameServiceIds::default(),
        }
    }
}

impl LensConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, LensError> {
        let config: LensConfig =
            serde_json::from_str(raw).map_err(|err| LensError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, LensError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` over the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LensError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LensConfig::default();
        if let Some(url) = lookup(ENV_RPC_URL) {
            config.rpc_url = url;
        }
        if let Some(url) = lookup(ENV_WS_URL) {
            config.ws_url = url;
        }
        if let Some(commitment) = lookup(ENV_COMMITMENT) {
            config.commitment = commitment;
        }
        if let Some(store) = lookup(ENV_STORE) {
            config.programs.store = Some(parse_address(&store)?);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig, LensError> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|_| LensError::Config(format!("unknown commitment `{}`", self.commitment)))
    }

    fn validate(&self) -> Result<(), LensError> {
        if self.rpc_url.trim().is_empty() {
            return Err(LensError::Config("rpc_url must not be empty".to_string()));
        }
        if self.ws_url.trim().is_empty() {
            return Err(LensError::Config("ws_url must not be empty".to_string()));
        }
        self.commitment_config()?;
        Ok(())
    }
}

mod serde_address {
    use std::str::FromStr;

    use serde::{de::Error, Deserialize, Deserializer};
    use solana_program::pubkey::Pubkey;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Pubkey::from_str(&raw).map_err(|_| D::Error::custom(format!("invalid address `{raw}`")))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Pubkey>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => Pubkey::from_str(&raw)
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("invalid address `{raw}`"))),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_mainnet() {
        let config = LensConfig::default();
        assert_eq!(config.programs.auction, AUCTION_PROGRAM_ID);
        assert_eq!(config.name_service.program, NAME_PROGRAM_ID);
        assert_eq!(config.commitment_config().unwrap(), CommitmentConfig::confirmed());
    }

    #[test]
    fn lookup_overrides_apply() {
        let store = Pubkey::new_unique();
        let vars: HashMap<&str, String> = HashMap::from([
            (ENV_RPC_URL, "http://localhost:8899".to_string()),
            (ENV_COMMITMENT, "finalized".to_string()),
            (ENV_STORE, store.to_string()),
        ]);
        let config = LensConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert_eq!(config.programs.store, Some(store));
        assert_eq!(config.commitment_config().unwrap(), CommitmentConfig::finalized());
    }

    #[test]
    fn json_partial_document_keeps_defaults() {
        let vault = Pubkey::new_unique();
        let raw = format!(r#"{{ "programs": {{ "vault": "{vault}" }} }}"#);
        let config = LensConfig::from_json_str(&raw).unwrap();
        assert_eq!(config.programs.vault, vault);
        assert_eq!(config.programs.auction, AUCTION_PROGRAM_ID);
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(LensConfig::from_json_str(r#"{ "commitment": "eventually" }"#).is_err());
        assert!(LensConfig::from_json_str(r#"{ "programs": { "auction": "zzz" } }"#).is_err());
        assert!(LensConfig::from_lookup(|key| (key == ENV_RPC_URL).then(String::new)).is_err());
    }
}
