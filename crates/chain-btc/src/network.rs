use std::str::FromStr;

use bitcoin::Network;

use crate::error::BtcError;

/// Insight explorer API for Bitcoin mainnet.
pub const MAINNET_EXPLORER: &str = "https://insight.bitpay.com/api/";

/// Insight explorer API for Bitcoin testnet.
pub const TESTNET_EXPLORER: &str = "https://test-insight.bitpay.com/api/";

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BtcNetwork {
    Mainnet,
    #[default]
    Testnet,
}

impl BtcNetwork {
    /// Convert to the `bitcoin` crate's `Network` type.
    pub fn to_bitcoin_network(self) -> Network {
        match self {
            BtcNetwork::Mainnet => Network::Bitcoin,
            BtcNetwork::Testnet => Network::Testnet,
        }
    }

    /// Return the default explorer endpoint for this network.
    pub fn default_explorer_url(self) -> &'static str {
        match self {
            BtcNetwork::Mainnet => MAINNET_EXPLORER,
            BtcNetwork::Testnet => TESTNET_EXPLORER,
        }
    }

    /// BIP-44 coin type.
    pub fn coin_type(self) -> u32 {
        match self {
            BtcNetwork::Mainnet => 0,
            BtcNetwork::Testnet => 1,
        }
    }
}

impl std::fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for BtcNetwork {
    type Err = BtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(BtcNetwork::Mainnet),
            "testnet" | "test" => Ok(BtcNetwork::Testnet),
            other => Err(BtcError::InvalidNetwork(other.to_string())),
        }
    }
}
