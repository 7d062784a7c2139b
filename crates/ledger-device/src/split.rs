use bitcoin::consensus::{deserialize, serialize};
use bitcoin::{Transaction, TxIn, TxOut};

use crate::error::DeviceError;

/// A previous or new transaction broken into the parts the Bitcoin app
/// streams to the device: version, inputs, outputs and locktime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTransaction {
    tx: Transaction,
}

impl SplitTransaction {
    pub fn from_hex(raw_hex: &str) -> Result<Self, DeviceError> {
        let bytes = hex::decode(raw_hex.trim())
            .map_err(|e| DeviceError::InvalidTransaction(format!("not hex: {e}")))?;
        let tx: Transaction =
            deserialize(&bytes).map_err(|e| DeviceError::InvalidTransaction(e.to_string()))?;
        Ok(Self { tx })
    }

    pub fn version(&self) -> [u8; 4] {
        self.tx.version.0.to_le_bytes()
    }

    pub fn inputs(&self) -> &[TxIn] {
        &self.tx.input
    }

    pub fn outputs(&self) -> &[TxOut] {
        &self.tx.output
    }

    pub fn lock_time(&self) -> [u8; 4] {
        self.tx.lock_time.to_consensus_u32().to_le_bytes()
    }

    pub fn has_witness(&self) -> bool {
        self.tx.input.iter().any(|input| !input.witness.is_empty())
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// Output count followed by each output, as hashed by the device when
    /// confirming the payment.
    pub fn serialize_outputs(&self) -> Vec<u8> {
        serialize(&self.tx.output)
    }
}

impl From<Transaction> for SplitTransaction {
    fn from(tx: Transaction) -> Self {
        Self { tx }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use bitcoin::absolute::LockTime;
    use bitcoin::consensus::encode::serialize_hex;
    use bitcoin::hashes::Hash;
    use bitcoin::transaction::Version;
    use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Txid, Witness};

    use super::*;

    pub(crate) fn sample_tx() -> Transaction {
        Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::new(Txid::all_zeros(), 3),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::default(),
            }],
            output: vec![TxOut {
                value: Amount::from_sat(10_000),
                script_pubkey: ScriptBuf::from_bytes(vec![0x76, 0xa9, 0x14]),
            }],
        }
    }

    #[test]
    fn splits_legacy_hex() {
        let hex = serialize_hex(&sample_tx());
        let split = SplitTransaction::from_hex(&hex).unwrap();

        assert_eq!(split.version(), [2, 0, 0, 0]);
        assert_eq!(split.inputs().len(), 1);
        assert_eq!(split.inputs()[0].previous_output.vout, 3);
        assert_eq!(split.outputs().len(), 1);
        assert_eq!(split.lock_time(), [0, 0, 0, 0]);
        assert!(!split.has_witness());
    }

    #[test]
    fn serializes_outputs_with_count_prefix() {
        let split = SplitTransaction::from(sample_tx());
        let bytes = split.serialize_outputs();

        let mut expected = vec![0x01];
        expected.extend_from_slice(&10_000u64.to_le_bytes());
        expected.extend_from_slice(&[0x03, 0x76, 0xa9, 0x14]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn rejects_non_hex() {
        let err = SplitTransaction::from_hex("xyz").unwrap_err();
        assert!(err.to_string().contains("not hex"));
    }

    #[test]
    fn rejects_truncated_transaction() {
        let hex = serialize_hex(&sample_tx());
        let err = SplitTransaction::from_hex(&hex[..20]).unwrap_err();
        assert!(matches!(err, DeviceError::InvalidTransaction(_)));
    }
}
