//! Serialized access to a Ledger Bitcoin app.
//!
//! Every device operation opens its own transport session through a
//! [`app::TransportFactory`] and runs under a single [`lock::DeviceLock`], so
//! concurrent callers queue instead of interleaving APDU exchanges. The wire
//! protocol itself lives behind the [`app::BtcApp`] trait.

pub mod app;
pub mod device;
pub mod error;
pub mod lock;
pub mod path;
pub mod split;

pub use app::{BtcApp, PaymentRequest, TransportFactory, WalletPublicKey};
pub use device::LedgerDevice;
pub use error::DeviceError;
pub use split::SplitTransaction;
