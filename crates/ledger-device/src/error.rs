use thiserror::Error;

/// Hardware wallet errors.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("device returned status {code:#06x}: {message}")]
    Status { code: u16, message: String },

    #[error("device communication failed: {0}")]
    Communication(String),

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
}

impl DeviceError {
    /// Map a status word returned by the Bitcoin app.
    pub fn from_status(code: u16) -> Self {
        let message = match code {
            0x6982 => "security status not satisfied, device locked",
            0x6985 => "conditions of use not satisfied, denied by user",
            0x6a80 => "invalid data",
            0x6b00 => "incorrect parameters",
            0x6d00 => "instruction not supported, is the Bitcoin app open?",
            0x6e00 => "class not supported, is the Bitcoin app open?",
            _ => "unknown status",
        };
        DeviceError::Status {
            code,
            message: message.to_string(),
        }
    }

    /// Whether the user refused the operation on the device.
    pub fn is_user_denied(&self) -> bool {
        matches!(self, DeviceError::Status { code: 0x6985, .. })
    }
}
