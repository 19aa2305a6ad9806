//! End-to-end configuration and identity loading tests

use inkpredict_bot::config::Config;
use inkpredict_bot::wallet::Registry;
use std::io::Write;

#[test]
fn test_config_example_loads() {
    let toml = include_str!("../config.toml.example");
    let config: Config = toml::from_str(toml).unwrap();
    assert!(config.api.base_url.starts_with("https://"));
    assert_eq!(config.betting.default_market_id, 109);
    assert_eq!(config.captcha.timeout_secs, 300);
    assert_eq!(config.faucet.ink_chain_id, 763373);
}

#[test]
fn test_identities_from_mixed_files() {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    };

    // Two keys, one listed address, one proxy: identities come from the
    // keys, the proxy binds positionally to the first.
    let keys = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318\n\
                # spare key below\n\
                4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362319\n";
    let registry = Registry::new(inkpredict_bot::config::WalletsConfig {
        wallets_file: write("wallets.txt", "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23\n"),
        keys_file: write("keys.txt", keys),
        proxies_file: write("proxies.txt", "user:pass@10.0.0.1:8080\n"),
    });

    let identities = registry.load().unwrap();
    assert_eq!(identities.len(), 2);
    assert!(identities[0]
        .address
        .eq_ignore_ascii_case("0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"));
    assert!(identities[0].signer.is_some());
    assert!(identities[0].proxy.is_some());
    assert!(identities[1].proxy.is_none());
}
