use chain_btc::utxo::Utxo;
use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// One entry of `GET addr/{address}/utxo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightUtxo {
    #[serde(default)]
    pub address: String,
    pub txid: String,
    pub vout: u32,
    #[serde(default)]
    pub script_pub_key: String,
    /// Value in BTC, as displayed by the explorer.
    #[serde(default)]
    pub amount: f64,
    pub satoshis: u64,
    /// Absent while unconfirmed.
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(default)]
    pub confirmations: u64,
}

impl TryFrom<InsightUtxo> for Utxo {
    type Error = ExplorerError;

    fn try_from(entry: InsightUtxo) -> Result<Self, Self::Error> {
        let script_pubkey = hex::decode(&entry.script_pub_key).map_err(|e| {
            ExplorerError::InvalidResponse(format!("scriptPubKey of {}:{}: {e}", entry.txid, entry.vout))
        })?;

        Ok(Utxo {
            txid: entry.txid,
            vout: entry.vout,
            amount_sat: entry.satoshis,
            script_pubkey,
        })
    }
}

/// Body of `GET rawtx/{txid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTxResponse {
    pub rawtx: String,
}

/// Body of `POST tx/send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub txid: String,
}
