use std::str::FromStr;

use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::PublicKey;

use crate::error::BtcError;
use crate::network::BtcNetwork;

/// Derive a legacy P2PKH address from a hex-encoded SEC1 public key.
///
/// Accepts both 33-byte compressed and 65-byte uncompressed keys; the Ledger
/// Bitcoin app reports the uncompressed form. Returns `1...` on mainnet and
/// `m...`/`n...` on testnet.
pub fn pubkey_to_p2pkh_address(pubkey_hex: &str, network: BtcNetwork) -> Result<String, BtcError> {
    let public_key = PublicKey::from_str(pubkey_hex)
        .map_err(|e| BtcError::InvalidPublicKey(format!("failed to parse public key: {e}")))?;

    let address = Address::p2pkh(public_key.pubkey_hash(), network.to_bitcoin_network());

    Ok(address.to_string())
}

/// Parse an address and require it to belong to `network`.
pub fn parse_address(address: &str, network: BtcNetwork) -> Result<Address, BtcError> {
    address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| BtcError::InvalidAddress(format!("{address}: {e}")))?
        .require_network(network.to_bitcoin_network())
        .map_err(|e| BtcError::InvalidAddress(format!("{address}: wrong network: {e}")))
}

/// Validate a Bitcoin address string for the given network.
///
/// Returns `true` if the address is valid for the specified network,
/// `false` if it is valid but for a different network.
pub fn validate_address(address: &str, network: BtcNetwork) -> Result<bool, BtcError> {
    let parsed = address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| BtcError::InvalidAddress(format!("failed to parse address: {e}")))?;

    Ok(parsed.is_valid_for_network(network.to_bitcoin_network()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generator point, i.e. the public key of private key 1.
    const G_COMPRESSED: &str =
        "0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798";
    const G_UNCOMPRESSED: &str = "0479BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8";

    #[test]
    fn p2pkh_mainnet_compressed_vector() {
        let address = pubkey_to_p2pkh_address(G_COMPRESSED, BtcNetwork::Mainnet).unwrap();
        assert_eq!(address, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    }

    #[test]
    fn p2pkh_mainnet_uncompressed_vector() {
        let address = pubkey_to_p2pkh_address(G_UNCOMPRESSED, BtcNetwork::Mainnet).unwrap();
        assert_eq!(address, "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm");
    }

    #[test]
    fn p2pkh_testnet_address_prefix() {
        let address = pubkey_to_p2pkh_address(G_UNCOMPRESSED, BtcNetwork::Testnet).unwrap();
        assert!(
            address.starts_with('m') || address.starts_with('n'),
            "expected m/n prefix, got {address}"
        );
        assert!(validate_address(&address, BtcNetwork::Testnet).unwrap());
    }

    #[test]
    fn invalid_pubkey_returns_error() {
        let result = pubkey_to_p2pkh_address(&"00".repeat(33), BtcNetwork::Mainnet);
        assert!(matches!(result, Err(BtcError::InvalidPublicKey(_))));
    }

    #[test]
    fn validate_mainnet_address_on_testnet_returns_false() {
        let valid =
            validate_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", BtcNetwork::Testnet).unwrap();
        assert!(!valid);
    }

    #[test]
    fn validate_garbage_address_returns_error() {
        assert!(validate_address("notanaddress!!!", BtcNetwork::Testnet).is_err());
    }

    #[test]
    fn parse_address_requires_network() {
        assert!(parse_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", BtcNetwork::Mainnet).is_ok());
        let err =
            parse_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", BtcNetwork::Testnet).unwrap_err();
        assert!(err.to_string().contains("wrong network"));
    }
}
