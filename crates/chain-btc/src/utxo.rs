use bitcoin::Amount;

use crate::error::BtcError;
use crate::transaction::{transaction_bytes, INPUT_BYTES, OUTPUT_BYTES};

/// A single unspent transaction output (UTXO).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    /// Transaction ID as a hex string (big-endian / display order).
    pub txid: String,
    /// Output index within the transaction.
    pub vout: u32,
    /// Value in satoshis.
    pub amount_sat: u64,
    /// The locking script (scriptPubKey) serialized bytes.
    pub script_pubkey: Vec<u8>,
}

/// A requested payment output. `address: None` marks change, which the
/// caller routes back to the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub address: Option<String>,
    pub value_sat: u64,
}

impl Recipient {
    pub fn to(address: impl Into<String>, value_sat: u64) -> Self {
        Self {
            address: Some(address.into()),
            value_sat,
        }
    }

    pub fn change(value_sat: u64) -> Self {
        Self {
            address: None,
            value_sat,
        }
    }

    pub fn is_change(&self) -> bool {
        self.address.is_none()
    }
}

/// Result of coin selection: the inputs to spend, the outputs to create
/// (requested recipients plus an optional change output) and the fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoSelection {
    pub inputs: Vec<Utxo>,
    pub outputs: Vec<Recipient>,
    pub fee_sat: u64,
}

impl UtxoSelection {
    /// Total value of the selected inputs in satoshis.
    pub fn total_in_sat(&self) -> u64 {
        self.inputs.iter().map(|u| u.amount_sat).sum()
    }

    /// Total value of all outputs, change included.
    pub fn total_out_sat(&self) -> u64 {
        self.outputs.iter().map(|o| o.value_sat).sum()
    }

    pub fn change(&self) -> Option<&Recipient> {
        self.outputs.iter().find(|o| o.is_change())
    }
}

/// Select UTXOs paying `recipients` at `fee_rate` sat/byte.
///
/// Candidates are ranked by effective value (value minus the cost of spending
/// them). A change-free "blackjack" fit is tried first; if none exists, UTXOs
/// are accumulated in rank order until the target plus fee is covered. A
/// change output is appended only when the leftover exceeds the dust
/// threshold, otherwise the leftover goes to the fee.
pub fn select_utxos(
    utxos: &[Utxo],
    recipients: &[Recipient],
    fee_rate: u64,
) -> Result<UtxoSelection, BtcError> {
    if recipients.is_empty() {
        return Err(BtcError::InvalidAmount("no recipients".into()));
    }
    if let Some(zero) = recipients.iter().find(|r| r.value_sat == 0) {
        return Err(BtcError::InvalidAmount(format!(
            "zero-value output to {}",
            zero.address.as_deref().unwrap_or("change")
        )));
    }

    let out_total = sum_sat(recipients.iter().map(|r| r.value_sat))?;
    if out_total > Amount::MAX_MONEY.to_sat() {
        return Err(BtcError::InvalidAmount(format!(
            "{out_total} sat exceeds the 21000000 BTC supply"
        )));
    }

    let mut ranked: Vec<&Utxo> = utxos.iter().collect();
    ranked.sort_by_key(|u| std::cmp::Reverse(effective_value(u, fee_rate)));

    match blackjack(&ranked, recipients, fee_rate) {
        Err(BtcError::InsufficientFunds { .. }) => accumulative(&ranked, recipients, fee_rate),
        result => result,
    }
}

fn overflow() -> BtcError {
    BtcError::InvalidAmount("amount overflow".into())
}

fn add_sat(a: u64, b: u64) -> Result<u64, BtcError> {
    a.checked_add(b).ok_or_else(overflow)
}

fn sum_sat(values: impl IntoIterator<Item = u64>) -> Result<u64, BtcError> {
    values.into_iter().try_fold(0u64, add_sat)
}

fn fee_for(bytes: u64, fee_rate: u64) -> Result<u64, BtcError> {
    bytes.checked_mul(fee_rate).ok_or_else(overflow)
}

fn effective_value(utxo: &Utxo, fee_rate: u64) -> i128 {
    utxo.amount_sat as i128 - (fee_rate as i128 * INPUT_BYTES as i128)
}

/// Only accepts inputs that do not overshoot the target by more than the
/// dust threshold, so a successful fit never needs change.
fn blackjack(
    ranked: &[&Utxo],
    recipients: &[Recipient],
    fee_rate: u64,
) -> Result<UtxoSelection, BtcError> {
    let out_total = sum_sat(recipients.iter().map(|r| r.value_sat))?;
    let threshold = fee_for(INPUT_BYTES, fee_rate)?;
    let mut bytes = transaction_bytes(0, recipients.len());
    let mut in_total = 0u64;
    let mut inputs = Vec::new();

    for utxo in ranked {
        let fee = fee_for(bytes + INPUT_BYTES, fee_rate)?;
        let target = add_sat(out_total, fee)?;
        let candidate = add_sat(in_total, utxo.amount_sat)?;
        if candidate > add_sat(target, threshold)? {
            continue;
        }

        bytes += INPUT_BYTES;
        in_total = candidate;
        inputs.push((*utxo).clone());

        if in_total < target {
            continue;
        }
        return finalize(inputs, recipients, fee_rate);
    }

    Err(BtcError::InsufficientFunds {
        fee_sat: fee_for(bytes, fee_rate)?,
    })
}

fn accumulative(
    ranked: &[&Utxo],
    recipients: &[Recipient],
    fee_rate: u64,
) -> Result<UtxoSelection, BtcError> {
    let out_total = sum_sat(recipients.iter().map(|r| r.value_sat))?;
    let input_fee = fee_for(INPUT_BYTES, fee_rate)?;
    let mut bytes = transaction_bytes(0, recipients.len());
    let mut in_total = 0u64;
    let mut inputs = Vec::new();

    for (i, utxo) in ranked.iter().enumerate() {
        // Spending this input would cost more than it is worth.
        if input_fee > utxo.amount_sat {
            if i == ranked.len() - 1 {
                return Err(BtcError::InsufficientFunds {
                    fee_sat: fee_for(bytes + INPUT_BYTES, fee_rate)?,
                });
            }
            continue;
        }

        bytes += INPUT_BYTES;
        in_total = add_sat(in_total, utxo.amount_sat)?;
        inputs.push((*utxo).clone());

        if in_total < add_sat(out_total, fee_for(bytes, fee_rate)?)? {
            continue;
        }
        return finalize(inputs, recipients, fee_rate);
    }

    Err(BtcError::InsufficientFunds {
        fee_sat: fee_for(bytes, fee_rate)?,
    })
}

fn finalize(
    inputs: Vec<Utxo>,
    recipients: &[Recipient],
    fee_rate: u64,
) -> Result<UtxoSelection, BtcError> {
    let in_total = sum_sat(inputs.iter().map(|u| u.amount_sat))?;
    let out_total = sum_sat(recipients.iter().map(|r| r.value_sat))?;
    let bytes = transaction_bytes(inputs.len(), recipients.len());

    let fee_with_change = fee_for(bytes + OUTPUT_BYTES, fee_rate)?;
    let threshold = fee_for(INPUT_BYTES, fee_rate)?;

    let mut outputs = recipients.to_vec();
    if let Some(remainder) = in_total.checked_sub(add_sat(out_total, fee_with_change)?) {
        if remainder > threshold {
            outputs.push(Recipient::change(remainder));
        }
    }

    let fee_sat = in_total
        .checked_sub(sum_sat(outputs.iter().map(|o| o.value_sat))?)
        .ok_or_else(|| BtcError::TransactionBuildError("outputs exceed inputs".into()))?;
    Ok(UtxoSelection {
        inputs,
        outputs,
        fee_sat,
    })
}
