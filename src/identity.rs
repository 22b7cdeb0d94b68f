//! Wallet-address → display-name lookup.  The resolver is an opaque external
//! collaborator; rendering never waits on it.

use std::collections::HashMap;

use crate::avatar::MAX_NAME_LEN;

pub trait DisplayNameResolver: Send + Sync {
    /// Human-readable name for `address`, if one is known.
    fn resolve(&self, address: &str) -> Option<String>;
}

/// Fixed address → name table.
#[derive(Debug, Default, Clone)]
pub struct StaticNames {
    names: HashMap<String, String>,
}

impl StaticNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, name: &str) -> Self {
        self.names.insert(address.to_lowercase(), name.to_string());
        self
    }
}

impl DisplayNameResolver for StaticNames {
    fn resolve(&self, address: &str) -> Option<String> {
        self.names.get(&address.to_lowercase()).cloned()
    }
}

/// `0xAbCd…1234`-style abbreviation for long hex addresses.
pub fn short_address(address: &str) -> String {
    let is_hex = address.starts_with("0x") && address.len() > 12 && address.is_ascii();
    if is_hex {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

/// Resolved name, or the abbreviated address when the resolver has none.
/// Cut to `MAX_NAME_LEN` characters either way.
pub fn display_label(resolver: Option<&dyn DisplayNameResolver>, address: &str) -> String {
    let label = resolver
        .and_then(|r| r.resolve(address))
        .unwrap_or_else(|| short_address(address));
    match label.char_indices().nth(MAX_NAME_LEN) {
        Some((cut, _)) => label[..cut].to_string(),
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_addresses_are_shortened() {
        assert_eq!(short_address("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"), "0xAb58...eC9B");
    }

    #[test]
    fn short_ids_are_kept() {
        assert_eq!(short_address("bot1"), "bot1");
    }

    #[test]
    fn resolver_is_case_insensitive() {
        let names = StaticNames::new().with("0xABCDEF0123456789", "alice.base.eth");
        assert_eq!(display_label(Some(&names), "0xabcdef0123456789"), "alice.base.eth");
        assert_eq!(display_label(None, "0xabcdef0123456789"), "0xabcd...6789");
    }
}
