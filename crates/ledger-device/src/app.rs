use async_trait::async_trait;
use bitcoin::bip32::DerivationPath;

use crate::error::DeviceError;
use crate::split::SplitTransaction;

/// Key material reported by the Bitcoin app for a derivation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletPublicKey {
    /// SEC1 public key, hex encoded (uncompressed on Ledger).
    pub public_key: String,
    pub bitcoin_address: String,
    pub chain_code: String,
}

/// Everything the device needs to sign a payment.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Previous transactions paired with the output index being spent.
    pub inputs: Vec<(SplitTransaction, u32)>,
    /// Signing path for each input, in input order.
    pub associated_keysets: Vec<DerivationPath>,
    pub change_path: Option<DerivationPath>,
    /// Serialized outputs of the new transaction, hex encoded.
    pub output_script_hex: String,
}

/// One open session with the Bitcoin app.
///
/// Implementations wrap a concrete transport (HID, U2F, emulator) and speak
/// the app's APDU protocol. Transaction splitting and output serialization
/// happen on the host and have default implementations.
#[async_trait]
pub trait BtcApp: Send {
    async fn get_wallet_public_key(
        &mut self,
        path: &DerivationPath,
    ) -> Result<WalletPublicKey, DeviceError>;

    /// Ask the device to sign; returns the signed transaction hex.
    async fn create_payment_transaction(
        &mut self,
        request: &PaymentRequest,
    ) -> Result<String, DeviceError>;

    fn set_debug_mode(&mut self, _enabled: bool) {}

    fn split_transaction(&self, raw_hex: &str) -> Result<SplitTransaction, DeviceError> {
        SplitTransaction::from_hex(raw_hex)
    }

    fn serialize_transaction_outputs(&self, split: &SplitTransaction) -> Vec<u8> {
        split.serialize_outputs()
    }
}

/// Opens a fresh transport session per device operation.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BtcApp>, DeviceError>;
}
