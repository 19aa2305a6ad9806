//! EIP-191 message signing and address derivation

use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

/// Signing capability for one wallet.
///
/// Wraps a local ECDSA signer; the address is derived from the key, never
/// taken on trust from a wallet list.
#[derive(Debug, Clone)]
pub struct WalletSigner {
    inner: PrivateKeySigner,
}

impl WalletSigner {
    /// Build a signer from a hex private key, with or without `0x` prefix.
    pub fn from_key(private_key: &str) -> anyhow::Result<Self> {
        let inner: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid private key: {e}"))?;
        Ok(Self { inner })
    }

    /// Checksummed address derived from the key. Deterministic.
    pub fn address(&self) -> String {
        self.inner.address().to_string()
    }

    /// Sign an arbitrary message per EIP-191, returning a 0x-prefixed hex
    /// signature.
    pub async fn sign_message(&self, message: &str) -> anyhow::Result<String> {
        let signature = self.inner.sign_message(message.as_bytes()).await?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }

    /// Case-insensitive check that this key belongs to `address`.
    pub fn matches_address(&self, address: &str) -> bool {
        self.address().eq_ignore_ascii_case(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test vector: this key derives
    // 0x2c7536E3605D9C16a7a3D7b1898e529396a65c23.
    const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const TEST_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

    #[test]
    fn test_derive_address() {
        let signer = WalletSigner::from_key(TEST_KEY).unwrap();
        assert!(signer.address().eq_ignore_ascii_case(TEST_ADDRESS));
    }

    #[test]
    fn test_derive_address_without_prefix() {
        let signer = WalletSigner::from_key(&TEST_KEY[2..]).unwrap();
        assert!(signer.address().eq_ignore_ascii_case(TEST_ADDRESS));
    }

    #[test]
    fn test_derive_address_idempotent() {
        let signer = WalletSigner::from_key(TEST_KEY).unwrap();
        assert_eq!(signer.address(), signer.address());

        let again = WalletSigner::from_key(TEST_KEY).unwrap();
        assert_eq!(signer.address(), again.address());
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(WalletSigner::from_key("not a key").is_err());
        assert!(WalletSigner::from_key("0x1234").is_err());
    }

    #[test]
    fn test_matches_address_case_insensitive() {
        let signer = WalletSigner::from_key(TEST_KEY).unwrap();
        assert!(signer.matches_address(&TEST_ADDRESS.to_lowercase()));
        assert!(signer.matches_address(&TEST_ADDRESS.to_uppercase().replace("0X", "0x")));
        assert!(!signer.matches_address("0x0000000000000000000000000000000000000000"));
    }

    #[tokio::test]
    async fn test_sign_message_format() {
        let signer = WalletSigner::from_key(TEST_KEY).unwrap();
        let sig = signer.sign_message("hello").await.unwrap();
        assert!(sig.starts_with("0x"));
        // 65-byte signature -> 130 hex chars
        assert_eq!(sig.len(), 132);
    }

    #[tokio::test]
    async fn test_sign_message_deterministic() {
        let signer = WalletSigner::from_key(TEST_KEY).unwrap();
        let a = signer.sign_message("payload").await.unwrap();
        let b = signer.sign_message("payload").await.unwrap();
        assert_eq!(a, b);
    }
}
