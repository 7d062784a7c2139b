use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::script::ScriptBuf;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, Sequence, Transaction, TxIn, TxOut, Txid, Witness};

use crate::address::parse_address;
use crate::error::BtcError;
use crate::network::BtcNetwork;
use crate::utxo::Utxo;

/// Version + locktime + input/output counts, in bytes.
pub const TX_EMPTY_BYTES: u64 = 10;

/// Outpoint + sequence + script length (41) plus a P2PKH scriptSig (107).
pub const INPUT_BYTES: u64 = 41 + 107;

/// Value + script length (9) plus a P2PKH scriptPubKey (25).
pub const OUTPUT_BYTES: u64 = 9 + 25;

/// An unsigned Bitcoin transaction ready for the device to sign.
#[derive(Debug, Clone)]
pub struct UnsignedBtcTx {
    /// The bitcoin transaction with empty scriptSigs.
    pub tx: Transaction,
}

impl UnsignedBtcTx {
    /// Legacy serialization as lowercase hex.
    pub fn to_hex(&self) -> String {
        serialize_hex(&self.tx)
    }

    pub fn txid(&self) -> Txid {
        self.tx.compute_txid()
    }
}

/// Estimated size in bytes of a P2PKH transaction.
pub fn transaction_bytes(num_inputs: usize, num_outputs: usize) -> u64 {
    TX_EMPTY_BYTES + (num_inputs as u64 * INPUT_BYTES) + (num_outputs as u64 * OUTPUT_BYTES)
}

/// Estimate the fee for a P2PKH transaction at `fee_rate` sat/byte.
/// Saturates at `u64::MAX`.
pub fn estimate_fee(num_inputs: usize, num_outputs: usize, fee_rate: u64) -> u64 {
    transaction_bytes(num_inputs, num_outputs).saturating_mul(fee_rate)
}

/// Smallest change worth creating: the cost of spending one more input.
pub fn dust_threshold(fee_rate: u64) -> u64 {
    INPUT_BYTES.saturating_mul(fee_rate)
}

/// Build an unsigned transaction spending `inputs` to `outputs`.
///
/// Every output address must be valid for `network`. Inputs carry empty
/// scriptSigs and final sequence numbers; the device fills in signatures.
pub fn build_unsigned_transaction(
    inputs: &[Utxo],
    outputs: &[(String, u64)],
    network: BtcNetwork,
) -> Result<UnsignedBtcTx, BtcError> {
    if inputs.is_empty() {
        return Err(BtcError::TransactionBuildError("no inputs".into()));
    }
    if outputs.is_empty() {
        return Err(BtcError::TransactionBuildError("no outputs".into()));
    }

    let mut tx_inputs = Vec::with_capacity(inputs.len());
    for utxo in inputs {
        let txid: Txid = utxo
            .txid
            .parse()
            .map_err(|e| BtcError::TransactionBuildError(format!("invalid txid {}: {e}", utxo.txid)))?;

        tx_inputs.push(TxIn {
            previous_output: OutPoint::new(txid, utxo.vout),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::default(),
        });
    }

    let mut tx_outputs = Vec::with_capacity(outputs.len());
    for (address, value_sat) in outputs {
        let address = parse_address(address, network)?;
        tx_outputs.push(TxOut {
            value: Amount::from_sat(*value_sat),
            script_pubkey: address.script_pubkey(),
        });
    }

    let tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: tx_inputs,
        output: tx_outputs,
    };

    Ok(UnsignedBtcTx { tx })
}
