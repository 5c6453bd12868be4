//! Static network registry — the closed set of chains this wallet knows.

/// Native-currency metadata for a chain, as required by `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Immutable chain metadata. The registry is a fixed, insertion-ordered list;
/// entries are never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEntry {
    pub key: String,
    pub chain_id: u64,
    pub display_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    /// Explorer front-end URLs, empty when the chain has no explorer.
    pub explorer_urls: Vec<String>,
    /// Explorer REST API hosts serving `?module=account&action=txlist`.
    pub explorer_api_urls: Vec<String>,
}

impl NetworkEntry {
    /// Primary node URL for this chain.
    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }

    /// Primary explorer API host, if the chain has one.
    pub fn explorer_api_url(&self) -> Option<&str> {
        self.explorer_api_urls.first().map(String::as_str)
    }
}

fn eth() -> NativeCurrency {
    NativeCurrency {
        name: "Ether".to_string(),
        symbol: "ETH".to_string(),
        decimals: 18,
    }
}

/// All known networks, in registry order.
pub fn entries() -> Vec<NetworkEntry> {
    vec![
        NetworkEntry {
            key: "local".to_string(),
            chain_id: 31337,
            display_name: "Localhost 8545".to_string(),
            rpc_urls: vec!["http://127.0.0.1:8545".to_string()],
            native_currency: eth(),
            explorer_urls: Vec::new(),
            explorer_api_urls: Vec::new(),
        },
        NetworkEntry {
            key: "testnet".to_string(),
            chain_id: 11155111,
            display_name: "Sepolia".to_string(),
            rpc_urls: vec!["https://rpc.sepolia.org".to_string()],
            native_currency: eth(),
            explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
            explorer_api_urls: vec!["https://api-sepolia.etherscan.io".to_string()],
        },
    ]
}

/// Resolve a UI network key ("local"/"testnet") to its entry.
/// Pure and synchronous; returns `None` for anything outside the closed set.
pub fn lookup(key: &str) -> Option<NetworkEntry> {
    entries().into_iter().find(|e| e.key == key)
}

/// Resolve a provider-reported chain id back to a registry entry.
pub fn lookup_chain_id(chain_id: u64) -> Option<NetworkEntry> {
    entries().into_iter().find(|e| e.chain_id == chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_exactly_two_entries_in_order() {
        let all = entries();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].key, "local");
        assert_eq!(all[1].key, "testnet");
    }

    #[test]
    fn lookup_known_keys() {
        assert_eq!(lookup("local").unwrap().chain_id, 31337);
        assert_eq!(lookup("testnet").unwrap().chain_id, 11155111);
    }

    #[test]
    fn lookup_unknown_key_is_none() {
        assert!(lookup("mainnet").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("LOCAL").is_none(), "keys are case-sensitive");
    }

    #[test]
    fn lookup_by_chain_id() {
        assert_eq!(lookup_chain_id(31337).unwrap().key, "local");
        assert_eq!(lookup_chain_id(11155111).unwrap().key, "testnet");
        assert!(lookup_chain_id(1).is_none());
    }

    #[test]
    fn local_network_has_no_explorer() {
        let local = lookup("local").unwrap();
        assert!(local.explorer_urls.is_empty());
        assert!(local.explorer_api_url().is_none());
        assert_eq!(local.rpc_url(), Some("http://127.0.0.1:8545"));
    }

    #[test]
    fn native_currency_is_18_decimal_eth() {
        for entry in entries() {
            assert_eq!(entry.native_currency.symbol, "ETH");
            assert_eq!(entry.native_currency.decimals, 18);
        }
    }
}
