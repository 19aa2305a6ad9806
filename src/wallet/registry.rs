//! Identity registry
//!
//! Credential sources are three line-oriented files (addresses, private keys,
//! proxies); `#`-prefixed and blank lines are skipped. Identity *i* is built
//! from element *i* of each list. Keys and proxies are optional per index.
//! When keys are present, addresses are derived from them; a supplied address
//! list is only used for a consistency warning and never overrides the
//! derived address.

use super::{Identity, ProxySpec, WalletSigner};
use crate::config::WalletsConfig;
use crate::error::ConfigError;
use std::path::Path;

/// Loads and pairs wallet credentials.
pub struct Registry {
    config: WalletsConfig,
}

impl Registry {
    pub fn new(config: WalletsConfig) -> Self {
        Self { config }
    }

    /// Load identities in file order.
    ///
    /// Missing optional files yield empty lists; the load only fails when no
    /// usable address or key exists at all.
    pub fn load(&self) -> Result<Vec<Identity>, ConfigError> {
        let addresses = self.load_addresses()?;
        let keys = self.load_keys()?;
        let proxies = self.load_proxies()?;

        if addresses.is_empty() && keys.is_empty() {
            return Err(ConfigError::NoIdentities {
                wallets_file: self.config.wallets_file.clone(),
                keys_file: self.config.keys_file.clone(),
            });
        }

        let identities = if keys.is_empty() {
            addresses
                .into_iter()
                .enumerate()
                .map(|(i, address)| Identity {
                    address,
                    signer: None,
                    proxy: proxies.get(i).cloned(),
                })
                .collect::<Vec<_>>()
        } else {
            // Derived addresses win; the wallet file is a cross-check only.
            keys.iter()
                .enumerate()
                .map(|(i, signer)| {
                    let derived = signer.address();
                    if let Some(listed) = addresses.get(i) {
                        if !signer.matches_address(listed) {
                            tracing::warn!(
                                index = i + 1,
                                listed = %listed,
                                derived = %derived,
                                "address list disagrees with key; using derived address"
                            );
                        }
                    }
                    Identity {
                        address: derived,
                        signer: Some(signer.clone()),
                        proxy: proxies.get(i).cloned(),
                    }
                })
                .collect()
        };

        for (i, id) in identities.iter().enumerate() {
            tracing::info!(
                index = i + 1,
                wallet = %id.short_address(),
                signed = id.signer.is_some(),
                proxy = id.proxy.as_ref().map(|p| p.redacted()),
                "loaded identity"
            );
        }

        Ok(identities)
    }

    fn load_addresses(&self) -> Result<Vec<String>, ConfigError> {
        let lines = read_entries(&self.config.wallets_file)?;
        let mut addresses = Vec::new();
        for (line_no, line) in lines {
            if is_valid_address(&line) {
                addresses.push(line);
            } else {
                tracing::warn!(
                    file = %self.config.wallets_file,
                    line = line_no,
                    "skipping line that is not a valid wallet address"
                );
            }
        }
        Ok(addresses)
    }

    fn load_keys(&self) -> Result<Vec<WalletSigner>, ConfigError> {
        let lines = read_entries(&self.config.keys_file)?;
        let mut signers = Vec::new();
        for (line_no, line) in lines {
            if !is_valid_key(&line) {
                tracing::warn!(
                    file = %self.config.keys_file,
                    line = line_no,
                    "skipping line that is not a valid private key"
                );
                continue;
            }
            match WalletSigner::from_key(&line) {
                Ok(signer) => signers.push(signer),
                Err(e) => tracing::warn!(
                    file = %self.config.keys_file,
                    line = line_no,
                    error = %e,
                    "skipping unparseable private key"
                ),
            }
        }
        Ok(signers)
    }

    fn load_proxies(&self) -> Result<Vec<ProxySpec>, ConfigError> {
        let lines = read_entries(&self.config.proxies_file)?;
        Ok(lines.into_iter().map(|(_, l)| ProxySpec::parse(&l)).collect())
    }
}

/// Read non-empty, non-comment lines with their 1-based line numbers.
/// A missing file is an empty list, not an error.
fn read_entries(path: &str) -> Result<Vec<(usize, String)>, ConfigError> {
    if !Path::new(path).exists() {
        tracing::debug!(file = %path, "credential file not present");
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;

    Ok(content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim().to_string()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .collect())
}

fn is_valid_address(line: &str) -> bool {
    line.len() == 42
        && line.starts_with("0x")
        && line[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn is_valid_key(line: &str) -> bool {
    let hex_part = line.strip_prefix("0x").unwrap_or(line);
    hex_part.len() == 64 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const TEST_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn registry_with(dir: &tempfile::TempDir, wallets: &str, keys: &str, proxies: &str) -> Registry {
        Registry::new(WalletsConfig {
            wallets_file: write_file(dir, "wallets.txt", wallets),
            keys_file: write_file(dir, "keys.txt", keys),
            proxies_file: write_file(dir, "proxies.txt", proxies),
        })
    }

    #[test]
    fn test_positional_pairing_fewer_proxies() {
        let dir = tempfile::tempdir().unwrap();
        let wallets = "0x1111111111111111111111111111111111111111\n\
                       0x2222222222222222222222222222222222222222\n\
                       0x3333333333333333333333333333333333333333\n";
        let registry = registry_with(&dir, wallets, "", "10.0.0.1:8080\n10.0.0.2:8080\n");

        let identities = registry.load().unwrap();
        assert_eq!(identities.len(), 3);
        for id in &identities {
            assert!(!id.address.is_empty());
        }
        assert!(identities[0].proxy.is_some());
        assert!(identities[1].proxy.is_some());
        assert!(identities[2].proxy.is_none());
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let wallets = "# header\n\n0x1111111111111111111111111111111111111111\n";
        let registry = registry_with(&dir, wallets, "", "");
        let identities = registry.load().unwrap();
        assert_eq!(identities.len(), 1);
    }

    #[test]
    fn test_invalid_address_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let wallets = "nonsense\n0x1111111111111111111111111111111111111111\n0xshort\n";
        let registry = registry_with(&dir, wallets, "", "");
        let identities = registry.load().unwrap();
        assert_eq!(identities.len(), 1);
    }

    #[test]
    fn test_keys_derive_addresses() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_with(&dir, "", &format!("{TEST_KEY}\n"), "");
        let identities = registry.load().unwrap();
        assert_eq!(identities.len(), 1);
        assert!(identities[0].address.eq_ignore_ascii_case(TEST_ADDRESS));
        assert!(identities[0].signer.is_some());
    }

    #[test]
    fn test_derived_address_wins_over_listed() {
        let dir = tempfile::tempdir().unwrap();
        // Listed address disagrees with the key on purpose.
        let registry = registry_with(
            &dir,
            "0x9999999999999999999999999999999999999999\n",
            &format!("{TEST_KEY}\n"),
            "",
        );
        let identities = registry.load().unwrap();
        assert!(identities[0].address.eq_ignore_ascii_case(TEST_ADDRESS));
    }

    #[test]
    fn test_no_credentials_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_with(&dir, "", "", "");
        let err = registry.load().unwrap_err();
        assert!(matches!(err, ConfigError::NoIdentities { .. }));
    }

    #[test]
    fn test_missing_files_are_fatal_only_without_credentials() {
        let registry = Registry::new(WalletsConfig {
            wallets_file: "/nonexistent/wallets.txt".to_string(),
            keys_file: "/nonexistent/keys.txt".to_string(),
            proxies_file: "/nonexistent/proxies.txt".to_string(),
        });
        assert!(matches!(
            registry.load().unwrap_err(),
            ConfigError::NoIdentities { .. }
        ));
    }

    #[test]
    fn test_key_without_prefix_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_with(&dir, "", &format!("{}\n", &TEST_KEY[2..]), "");
        let identities = registry.load().unwrap();
        assert_eq!(identities.len(), 1);
    }
}
