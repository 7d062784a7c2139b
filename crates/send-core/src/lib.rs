//! Hardware-wallet send flow for Bitcoin testnet.
//!
//! A [`SendSession`] walks one payment through
//! connect → prepare → sign → broadcast, keeping the state a host UI renders
//! in a [`SendForm`]:
//!
//! ```text
//! SendSession
//!   ├── SendForm       addresses, value, fee, hex, history, errors
//!   ├── Explorer       UTXOs, raw transactions, broadcast (Insight)
//!   ├── LedgerDevice   one lock, one transport session per call
//!   └── chain_btc      coin selection, unsigned transaction
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use send_core::{SendConfig, SendSession};
//!
//! send_core::logging::init_logging();
//! let mut session = SendSession::insight(SendConfig::from_env()?, transport)?;
//! session.handle_connect().await?;
//! session.handle_default_to();
//! session.set_value("0.001");
//! session.handle_sign_tx().await;
//! let txid = session.handle_broadcast_tx().await?;
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod session;

pub use config::SendConfig;
pub use error::SendError;
pub use form::SendForm;
pub use session::{PreparedTx, SendSession};
