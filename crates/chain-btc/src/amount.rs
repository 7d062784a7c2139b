use bitcoin::{Amount, Denomination};

use crate::error::BtcError;

/// Parse a user-entered BTC amount (`"0.0015"`) into satoshis.
///
/// At most eight decimal places are accepted. Zero, negative and amounts
/// above the 21M BTC supply cap are rejected.
pub fn btc_to_sat(value: &str) -> Result<u64, BtcError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BtcError::InvalidAmount("empty amount".into()));
    }

    let amount = Amount::from_str_in(trimmed, Denomination::Bitcoin)
        .map_err(|e| BtcError::InvalidAmount(format!("{trimmed}: {e}")))?;

    if amount == Amount::ZERO {
        return Err(BtcError::InvalidAmount("amount must be positive".into()));
    }
    if amount > Amount::MAX_MONEY {
        return Err(BtcError::InvalidAmount(format!(
            "{trimmed} exceeds the 21000000 BTC supply"
        )));
    }
    Ok(amount.to_sat())
}

/// Format satoshis as a BTC decimal string.
pub fn sat_to_btc(sat: u64) -> String {
    Amount::from_sat(sat).to_string_in(Denomination::Bitcoin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(btc_to_sat("1").unwrap(), 100_000_000);
        assert_eq!(btc_to_sat("0.0001").unwrap(), 10_000);
        assert_eq!(btc_to_sat(" 0.00000001 ").unwrap(), 1);
    }

    #[test]
    fn rejects_more_than_eight_decimals() {
        assert!(btc_to_sat("0.000000001").is_err());
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        assert!(btc_to_sat("0").is_err());
        assert!(btc_to_sat("-0.1").is_err());
        assert!(btc_to_sat("abc").is_err());
        assert!(btc_to_sat("").is_err());
    }

    #[test]
    fn caps_amounts_at_max_supply() {
        assert_eq!(btc_to_sat("21000000").unwrap(), 2_100_000_000_000_000);

        let err = btc_to_sat("21000001").unwrap_err();
        assert!(err.to_string().contains("supply"), "{err}");
        assert!(btc_to_sat("184467440737.0955").is_err());
    }

    #[test]
    fn formatted_amount_parses_back() {
        assert_eq!(btc_to_sat(&sat_to_btc(12_430)).unwrap(), 12_430);
        assert!(sat_to_btc(100_000_000).starts_with('1'));
    }
}
