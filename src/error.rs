use solana_program::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unexpected account length: expected {expected}, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },

    #[error("Malformed account data: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LensError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to decode account {account}: {source}")]
    Decode {
        account: Pubkey,
        #[source]
        source: DecodeError,
    },

    #[error("Subscription failed for program {program_id}: {reason}")]
    Subscription { program_id: Pubkey, reason: String },

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LensError {
    pub fn decode(account: Pubkey, source: DecodeError) -> Self {
        LensError::Decode { account, source }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        DecodeError::Malformed(e.to_string())
    }
}

pub type LensResult<T> = Result<T, LensError>;
