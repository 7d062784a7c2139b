use chain_btc::utxo::Utxo;
use ledger_device::path::ADDRESS_PATH;

/// Everything the host UI renders for one send session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendForm {
    /// Receive path of the connected wallet.
    pub path: String,
    pub from_address: Option<String>,
    pub from_public_key: Option<String>,
    pub to_address: Option<String>,
    /// Amount in BTC exactly as the user typed it.
    pub value: Option<String>,
    /// Fee in satoshis of the prepared transaction.
    pub fee: Option<u64>,
    pub raw_hex: Option<String>,
    pub signed_hex: Option<String>,
    /// Txids broadcast during this session, oldest first.
    pub history: Vec<String>,
    pub utxos: Vec<Utxo>,
    /// Inputs of the prepared transaction.
    pub selected_inputs: Vec<Utxo>,
    pub prepare_error: Option<String>,
    pub sign_error: Option<String>,
}

impl Default for SendForm {
    fn default() -> Self {
        Self::new(ADDRESS_PATH)
    }
}

impl SendForm {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from_address: None,
            from_public_key: None,
            to_address: None,
            value: None,
            fee: None,
            raw_hex: None,
            signed_hex: None,
            history: Vec::new(),
            utxos: Vec::new(),
            selected_inputs: Vec::new(),
            prepare_error: None,
            sign_error: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.from_address.is_some()
    }

    /// Clear everything derived from the destination.
    pub(crate) fn reset_destination(&mut self) {
        self.history.clear();
        self.value = None;
        self.clear_pending();
        self.prepare_error = None;
        self.sign_error = None;
    }

    /// Drop the prepared transaction and its signature.
    pub(crate) fn clear_pending(&mut self) {
        self.fee = None;
        self.raw_hex = None;
        self.signed_hex = None;
        self.selected_inputs.clear();
    }

    pub(crate) fn record_broadcast(&mut self, txid: String) {
        self.history.push(txid);
        self.value = None;
        self.clear_pending();
        self.utxos.clear();
        self.to_address = None;
        self.from_address = None;
    }

    pub(crate) fn reset_session(&mut self) {
        self.history.clear();
        self.from_address = None;
        self.from_public_key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SendForm {
        SendForm {
            from_address: Some("mfrom".into()),
            from_public_key: Some("04ab".into()),
            to_address: Some("mto".into()),
            value: Some("0.001".into()),
            fee: Some(12_430),
            raw_hex: Some("0200".into()),
            signed_hex: Some("0200ff".into()),
            history: vec!["t1".into()],
            utxos: vec![Utxo {
                txid: "aa".into(),
                vout: 0,
                amount_sat: 1,
                script_pubkey: Vec::new(),
            }],
            prepare_error: Some("x".into()),
            sign_error: Some("y".into()),
            ..SendForm::default()
        }
    }

    #[test]
    fn default_uses_receive_path() {
        let form = SendForm::default();
        assert_eq!(form.path, "44'/1'/0'/0/0");
        assert!(!form.is_connected());
        assert!(form.history.is_empty());
    }

    #[test]
    fn reset_destination_keeps_wallet_and_target() {
        let mut form = filled();
        form.reset_destination();

        assert_eq!(form.to_address.as_deref(), Some("mto"));
        assert_eq!(form.from_address.as_deref(), Some("mfrom"));
        assert_eq!(form.utxos.len(), 1);
        assert!(form.history.is_empty());
        assert!(form.value.is_none() && form.fee.is_none());
        assert!(form.raw_hex.is_none() && form.signed_hex.is_none());
        assert!(form.prepare_error.is_none() && form.sign_error.is_none());
    }

    #[test]
    fn record_broadcast_appends_and_clears() {
        let mut form = filled();
        form.record_broadcast("t2".into());

        assert_eq!(form.history, vec!["t1".to_string(), "t2".to_string()]);
        assert!(form.utxos.is_empty());
        assert!(form.to_address.is_none() && form.from_address.is_none());
        assert!(form.signed_hex.is_none());
    }

    #[test]
    fn reset_session_forgets_wallet() {
        let mut form = filled();
        form.reset_session();

        assert!(form.history.is_empty());
        assert!(!form.is_connected());
        assert!(form.from_public_key.is_none());
        assert_eq!(form.to_address.as_deref(), Some("mto"));
    }
}
