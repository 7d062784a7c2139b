use btc_explorer::error::ExplorerError;
use chain_btc::error::BtcError;
use chain_btc::network::BtcNetwork;
use ledger_device::DeviceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("no device connected")]
    NotConnected,

    #[error("destination address not set")]
    MissingDestination,

    #[error("amount not set")]
    MissingValue,

    #[error("no prepared transaction to sign")]
    NothingToSign,

    #[error("no signed transaction to broadcast")]
    NothingToBroadcast,

    #[error("address {address} is not a {network} address")]
    WrongNetwork { address: String, network: BtcNetwork },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Btc(#[from] BtcError),

    #[error("explorer: {0}")]
    Explorer(#[from] ExplorerError),

    #[error("device: {0}")]
    Device(#[from] DeviceError),
}
