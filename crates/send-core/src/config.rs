use chain_btc::network::BtcNetwork;
use ledger_device::path::{ACCOUNT_PATH, ADDRESS_PATH};

use crate::error::SendError;

/// Fee rate used for coin selection, in sat/byte.
pub const DEFAULT_FEE_RATE: u64 = 55;

/// Testnet address offered as the one-click destination.
pub const DEFAULT_RECEIVER: &str = "mt7r5FKWoKXPtAdkuCYm3AyoQk4vyxUdYA";

pub const NETWORK_ENV: &str = "LEDGER_SEND_NETWORK";
pub const EXPLORER_URL_ENV: &str = "LEDGER_SEND_EXPLORER_URL";
pub const FEE_RATE_ENV: &str = "LEDGER_SEND_FEE_RATE";
pub const DEFAULT_RECEIVER_ENV: &str = "LEDGER_SEND_DEFAULT_RECEIVER";

fn account_path_for(network: BtcNetwork) -> String {
    format!("44'/{}'/0'/0", network.coin_type())
}

/// Session configuration. Defaults target testnet through the public
/// Insight explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendConfig {
    pub network: BtcNetwork,
    pub explorer_url: String,
    pub fee_rate: u64,
    pub default_receiver: String,
    /// Path the device signs with.
    pub account_path: String,
    /// Path shown as the session's receive address.
    pub address_path: String,
}

impl Default for SendConfig {
    fn default() -> Self {
        let network = BtcNetwork::default();
        Self {
            network,
            explorer_url: network.default_explorer_url().to_string(),
            fee_rate: DEFAULT_FEE_RATE,
            default_receiver: DEFAULT_RECEIVER.to_string(),
            account_path: ACCOUNT_PATH.to_string(),
            address_path: ADDRESS_PATH.to_string(),
        }
    }
}

impl SendConfig {
    /// Switch network; explorer and paths follow unless they were customised.
    pub fn with_network(mut self, network: BtcNetwork) -> Self {
        if self.explorer_url == self.network.default_explorer_url() {
            self.explorer_url = network.default_explorer_url().to_string();
        }
        if self.account_path == account_path_for(self.network) {
            self.account_path = account_path_for(network);
            self.address_path = format!("{}/0", self.account_path);
        }
        self.network = network;
        self
    }

    pub fn with_explorer_url(mut self, url: impl Into<String>) -> Self {
        self.explorer_url = url.into();
        self
    }

    pub fn with_fee_rate(mut self, fee_rate: u64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    pub fn with_default_receiver(mut self, address: impl Into<String>) -> Self {
        self.default_receiver = address.into();
        self
    }

    /// Defaults overridden by `LEDGER_SEND_*` environment variables.
    pub fn from_env() -> Result<Self, SendError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SendError> {
        let mut config = Self::default();

        if let Some(network) = lookup(NETWORK_ENV) {
            let network = network
                .parse::<BtcNetwork>()
                .map_err(|e| SendError::InvalidConfig(format!("{NETWORK_ENV}: {e}")))?;
            config = config.with_network(network);
        }
        if let Some(url) = lookup(EXPLORER_URL_ENV) {
            config = config.with_explorer_url(url);
        }
        if let Some(rate) = lookup(FEE_RATE_ENV) {
            let rate = rate
                .trim()
                .parse::<u64>()
                .map_err(|e| SendError::InvalidConfig(format!("{FEE_RATE_ENV}: {e}")))?;
            config = config.with_fee_rate(rate);
        }
        if let Some(receiver) = lookup(DEFAULT_RECEIVER_ENV) {
            config = config.with_default_receiver(receiver);
        }

        Ok(config)
    }
}
