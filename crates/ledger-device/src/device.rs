use bitcoin::bip32::DerivationPath;
use tracing::{debug, info};

use crate::app::{PaymentRequest, TransportFactory, WalletPublicKey};
use crate::error::DeviceError;
use crate::lock::DeviceLock;
use crate::path::account_path;
use crate::split::SplitTransaction;

/// A Ledger running the Bitcoin app.
///
/// Each method takes the device lock, opens a new transport session, performs
/// a single app call and closes the session. There is no retry, timeout or
/// reconnection; errors from the transport or the app are returned as-is.
pub struct LedgerDevice<F> {
    factory: F,
    lock: DeviceLock,
    account_path: DerivationPath,
}

impl<F: TransportFactory> LedgerDevice<F> {
    /// Device using the testnet account path `44'/1'/0'/0`.
    pub fn new(factory: F) -> Self {
        Self::with_account_path(factory, account_path())
    }

    pub fn with_account_path(factory: F, account_path: DerivationPath) -> Self {
        Self {
            factory,
            lock: DeviceLock::default(),
            account_path,
        }
    }

    pub fn account_path(&self) -> &DerivationPath {
        &self.account_path
    }

    pub fn lock(&self) -> &DeviceLock {
        &self.lock
    }

    /// Public key and address for the account path.
    pub async fn get_address_info(&self) -> Result<WalletPublicKey, DeviceError> {
        let _guard = self.lock.acquire("get_address_info").await;
        let mut app = self.factory.open().await?;
        let info = app.get_wallet_public_key(&self.account_path).await?;
        info!(address = %info.bitcoin_address, "device address retrieved");
        Ok(info)
    }

    pub async fn split_transaction(&self, raw_hex: &str) -> Result<SplitTransaction, DeviceError> {
        let _guard = self.lock.acquire("split_transaction").await;
        let app = self.factory.open().await?;
        let split = app.split_transaction(raw_hex)?;
        debug!(
            inputs = split.inputs().len(),
            outputs = split.outputs().len(),
            "transaction split"
        );
        Ok(split)
    }

    pub async fn serialize_transaction_outputs(
        &self,
        split: &SplitTransaction,
    ) -> Result<Vec<u8>, DeviceError> {
        let _guard = self.lock.acquire("serialize_transaction_outputs").await;
        let app = self.factory.open().await?;
        Ok(app.serialize_transaction_outputs(split))
    }

    /// Sign on the device. The transport runs in debug mode for this call.
    pub async fn create_payment_transaction(
        &self,
        request: &PaymentRequest,
    ) -> Result<String, DeviceError> {
        let _guard = self.lock.acquire("create_payment_transaction").await;
        let mut app = self.factory.open().await?;
        app.set_debug_mode(true);
        info!(inputs = request.inputs.len(), "requesting device signature");
        app.create_payment_transaction(request).await
    }
}
