use std::str::FromStr;

use bitcoin::bip32::{ChildNumber, DerivationPath};

use crate::error::DeviceError;

/// Account-level path the Ledger app signs with on testnet.
pub const ACCOUNT_PATH: &str = "44'/1'/0'/0";

/// First receive address below [`ACCOUNT_PATH`].
pub const ADDRESS_PATH: &str = "44'/1'/0'/0/0";

/// [`ACCOUNT_PATH`] as a typed path.
pub fn account_path() -> DerivationPath {
    DerivationPath::from(vec![
        ChildNumber::Hardened { index: 44 },
        ChildNumber::Hardened { index: 1 },
        ChildNumber::Hardened { index: 0 },
        ChildNumber::Normal { index: 0 },
    ])
}

/// Parse a Ledger-style path (`44'/1'/0'/0`); a leading `m/` is optional.
pub fn parse_path(path: &str) -> Result<DerivationPath, DeviceError> {
    let trimmed = path.trim();
    let normalized = if trimmed == "m" || trimmed.starts_with("m/") {
        trimmed.to_string()
    } else {
        format!("m/{trimmed}")
    };
    DerivationPath::from_str(&normalized).map_err(|e| DeviceError::InvalidPath(format!("{path}: {e}")))
}
