//! Wallet identities
//!
//! Loads wallet addresses, signing keys and proxies from line-oriented files
//! and pairs them positionally into immutable [`Identity`] values. One
//! identity maps to exactly one transport session for the lifetime of a run.

mod proxy;
mod registry;
mod signer;

pub use proxy::ProxySpec;
pub use registry::Registry;
pub use signer::WalletSigner;

/// One wallet operated as an independent actor.
///
/// Immutable after construction. When a signing key is present the address is
/// always the one derived from the key.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Checksummed wallet address
    pub address: String,
    /// Signing capability; wagers go out unsigned without it
    pub signer: Option<WalletSigner>,
    /// Egress proxy for every request this identity makes
    pub proxy: Option<ProxySpec>,
}

impl Identity {
    /// Abbreviated address for log lines.
    pub fn short_address(&self) -> String {
        if self.address.len() > 10 {
            format!("{}...", &self.address[..10])
        } else {
            self.address.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        let id = Identity {
            address: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
            signer: None,
            proxy: None,
        };
        assert_eq!(id.short_address(), "0x12345678...");
    }

    #[test]
    fn test_short_address_tiny() {
        let id = Identity {
            address: "0xabc".to_string(),
            signer: None,
            proxy: None,
        };
        assert_eq!(id.short_address(), "0xabc");
    }
}
