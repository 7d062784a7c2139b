//! Bitcoin chain support for the Ledger send flow.
//!
//! Provides legacy P2PKH address handling, UTXO coin selection with a
//! byte-based fee model, and unsigned transaction building for the device
//! to sign.

pub mod address;
pub mod amount;
pub mod error;
pub mod network;
pub mod transaction;
pub mod utxo;
