use thiserror::Error;

/// Bitcoin chain operation errors.
#[derive(Debug, Error)]
pub enum BtcError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("cannot build tx: insufficient funds (estimated fee {fee_sat} sat)")]
    InsufficientFunds { fee_sat: u64 },

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),
}
