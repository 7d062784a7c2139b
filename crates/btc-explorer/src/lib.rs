//! Block-explorer access for the Ledger send flow.
//!
//! The [`Explorer`] trait is what the send session depends on;
//! [`insight::InsightClient`] implements it against the Insight REST API.

pub mod error;
pub mod insight;
pub mod types;

use async_trait::async_trait;
use chain_btc::utxo::Utxo;

use error::ExplorerError;

/// Read and broadcast access to a Bitcoin block explorer.
#[async_trait]
pub trait Explorer: Send + Sync {
    /// Unspent outputs currently owned by `address`.
    async fn utxos(&self, address: &str) -> Result<Vec<Utxo>, ExplorerError>;

    /// Raw transaction hex for `txid`.
    async fn raw_transaction(&self, txid: &str) -> Result<String, ExplorerError>;

    /// Submit a signed transaction; returns the txid the explorer reports.
    async fn broadcast(&self, raw_hex: &str) -> Result<String, ExplorerError>;
}
