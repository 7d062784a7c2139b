use btc_explorer::insight::InsightClient;
use btc_explorer::Explorer;
use chain_btc::address::validate_address;
use chain_btc::amount::{btc_to_sat, sat_to_btc};
use chain_btc::transaction::build_unsigned_transaction;
use chain_btc::utxo::{select_utxos, Recipient, Utxo};
use futures::future::try_join_all;
use ledger_device::path::parse_path;
use ledger_device::{LedgerDevice, PaymentRequest, TransportFactory};
use tracing::{error, info, warn};

use crate::config::SendConfig;
use crate::error::SendError;
use crate::form::SendForm;

/// Result of a successful prepare step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTx {
    pub inputs: Vec<Utxo>,
    pub outputs: Vec<(String, u64)>,
    pub fee_sat: u64,
    pub raw_hex: String,
}

/// Route change outputs (no address) back to `sender`.
pub fn default_change_address(
    outputs: &[Recipient],
    sender: Option<&str>,
) -> Result<Vec<(String, u64)>, SendError> {
    outputs
        .iter()
        .map(|output| match (&output.address, sender) {
            (Some(address), _) => Ok((address.clone(), output.value_sat)),
            (None, Some(sender)) => Ok((sender.to_string(), output.value_sat)),
            (None, None) => Err(SendError::NotConnected),
        })
        .collect()
}

/// One user's send flow: connect, prepare, sign, broadcast.
///
/// Handlers take `&mut self`, so a session never runs two of them at once.
pub struct SendSession<E, F> {
    config: SendConfig,
    explorer: E,
    device: LedgerDevice<F>,
    form: SendForm,
}

impl<F: TransportFactory> SendSession<InsightClient, F> {
    /// Session talking to the Insight explorer named in `config`.
    pub fn insight(config: SendConfig, factory: F) -> Result<Self, SendError> {
        let explorer = InsightClient::new(&config.explorer_url)?;
        Self::new(config, explorer, factory)
    }
}

impl<E: Explorer, F: TransportFactory> SendSession<E, F> {
    pub fn new(config: SendConfig, explorer: E, factory: F) -> Result<Self, SendError> {
        let account_path = parse_path(&config.account_path)?;
        parse_path(&config.address_path)?;

        let device = LedgerDevice::with_account_path(factory, account_path);
        let form = SendForm::new(config.address_path.clone());
        Ok(Self {
            config,
            explorer,
            device,
            form,
        })
    }

    pub fn form(&self) -> &SendForm {
        &self.form
    }

    pub fn config(&self) -> &SendConfig {
        &self.config
    }

    pub fn device(&self) -> &LedgerDevice<F> {
        &self.device
    }

    /// Read the wallet from the device and load its UTXOs.
    pub async fn handle_connect(&mut self) -> Result<(), SendError> {
        let info = self.device.get_address_info().await?;
        let address = info.bitcoin_address;

        if !validate_address(&address, self.config.network)? {
            return Err(SendError::WrongNetwork {
                address,
                network: self.config.network,
            });
        }

        let utxos = self.explorer.utxos(&address).await?;
        info!(%address, utxos = utxos.len(), "wallet connected");

        // A new UTXO set invalidates anything prepared or signed from the old one.
        self.form.clear_pending();
        self.form.utxos = utxos;
        self.form.from_address = Some(address);
        self.form.from_public_key = Some(info.public_key);
        Ok(())
    }

    /// Pay to the configured default receiver.
    pub fn handle_default_to(&mut self) {
        self.form.to_address = Some(self.config.default_receiver.clone());
        self.handle_to_update();
    }

    pub fn set_to_address(&mut self, address: impl Into<String>) {
        self.form.to_address = Some(address.into());
        self.handle_to_update();
    }

    /// The destination changed: everything downstream is stale.
    pub fn handle_to_update(&mut self) {
        self.form.reset_destination();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.form.value = Some(value.into());
        self.handle_value_update();
    }

    /// Re-run coin selection and rebuild the unsigned transaction.
    ///
    /// Failures land in `prepare_error`; this never returns an error.
    pub fn handle_value_update(&mut self) {
        match self.prepare() {
            Ok(prepared) => {
                info!(
                    inputs = prepared.inputs.len(),
                    outputs = prepared.outputs.len(),
                    fee = %sat_to_btc(prepared.fee_sat),
                    "transaction prepared"
                );
                self.form.fee = Some(prepared.fee_sat);
                self.form.raw_hex = Some(prepared.raw_hex);
                self.form.selected_inputs = prepared.inputs;
                self.form.signed_hex = None;
                self.form.prepare_error = None;
            }
            Err(e) => {
                warn!(error = %e, "cannot prepare transaction");
                self.form.clear_pending();
                self.form.prepare_error = Some(e.to_string());
            }
        }
    }

    pub fn prepare(&self) -> Result<PreparedTx, SendError> {
        let to = self
            .form
            .to_address
            .as_deref()
            .ok_or(SendError::MissingDestination)?;
        let value = self.form.value.as_deref().ok_or(SendError::MissingValue)?;
        let value_sat = btc_to_sat(value)?;

        let selection = select_utxos(
            &self.form.utxos,
            &[Recipient::to(to, value_sat)],
            self.config.fee_rate,
        )?;
        let outputs = default_change_address(&selection.outputs, self.form.from_address.as_deref())?;
        let unsigned = build_unsigned_transaction(&selection.inputs, &outputs, self.config.network)?;

        Ok(PreparedTx {
            inputs: selection.inputs,
            outputs,
            fee_sat: selection.fee_sat,
            raw_hex: unsigned.to_hex(),
        })
    }

    /// Sign the prepared transaction on the device.
    ///
    /// Failures are logged and kept in `sign_error`; `signed_hex` is left
    /// untouched.
    pub async fn handle_sign_tx(&mut self) {
        match self.sign().await {
            Ok(signed) => {
                info!(bytes = signed.len() / 2, "transaction signed");
                self.form.signed_hex = Some(signed);
                self.form.sign_error = None;
            }
            Err(e) => {
                error!(error = %e, "signing failed");
                self.form.sign_error = Some(e.to_string());
            }
        }
    }

    async fn sign(&self) -> Result<String, SendError> {
        let raw_hex = self.form.raw_hex.as_deref().ok_or(SendError::NothingToSign)?;

        let previous = try_join_all(self.form.selected_inputs.iter().map(|utxo| async move {
            let raw = self.explorer.raw_transaction(&utxo.txid).await?;
            let split = self.device.split_transaction(&raw).await?;
            Ok::<_, SendError>((split, utxo.vout))
        }))
        .await?;

        let unsigned = self.device.split_transaction(raw_hex).await?;
        let outputs = self.device.serialize_transaction_outputs(&unsigned).await?;

        let account_path = self.device.account_path().clone();
        let request = PaymentRequest {
            associated_keysets: vec![account_path.clone(); previous.len()],
            inputs: previous,
            change_path: Some(account_path),
            output_script_hex: hex::encode(outputs),
        };

        Ok(self.device.create_payment_transaction(&request).await?)
    }

    /// Broadcast the signed transaction and start over with a clean form.
    pub async fn handle_broadcast_tx(&mut self) -> Result<String, SendError> {
        let signed = self
            .form
            .signed_hex
            .as_deref()
            .ok_or(SendError::NothingToBroadcast)?;

        let txid = self.explorer.broadcast(signed).await?;
        info!(%txid, "transaction broadcast");
        self.form.record_broadcast(txid.clone());
        Ok(txid)
    }

    /// Forget the wallet and the session history.
    pub fn handle_reset(&mut self) {
        self.form.reset_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_addresses_are_kept() {
        let outputs = vec![Recipient::to("mto", 10_000), Recipient::change(500)];
        let resolved = default_change_address(&outputs, Some("mfrom")).unwrap();
        assert_eq!(
            resolved,
            vec![("mto".to_string(), 10_000), ("mfrom".to_string(), 500)]
        );
    }

    #[test]
    fn change_without_sender_is_an_error() {
        let outputs = vec![Recipient::change(500)];
        let err = default_change_address(&outputs, None).unwrap_err();
        assert!(matches!(err, SendError::NotConnected));
    }

    #[test]
    fn no_change_needs_no_sender() {
        let outputs = vec![Recipient::to("mto", 10_000)];
        assert!(default_change_address(&outputs, None).is_ok());
    }
}
