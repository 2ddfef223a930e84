//! Core contract registry.

use crate::error::SubgraphError;

/// Ordered mapping from logical contract name to on-chain address.
///
/// Iteration order is the order entries were added (or JSON key order when
/// parsed), and every fan-out operation preserves it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractRegistry {
    entries: Vec<(String, String)>,
}

impl ContractRegistry {
    /// Build a registry from name/address pairs.
    #[must_use]
    pub fn new<I, N, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, A)>,
        N: Into<String>,
        A: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, addr)| (name.into(), addr.into()))
                .collect(),
        }
    }

    /// Parse a registry from a JSON object of `{ "name": "address" }`
    /// entries, preserving key order.
    pub fn from_json(json: &str) -> Result<Self, SubgraphError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(map.len());
        for (name, value) in map {
            let address = value.as_str().ok_or_else(|| SubgraphError::Json(format!(
                "registry entry {name} is not a string address"
            )))?;
            entries.push((name, address.to_string()));
        }
        Ok(Self { entries })
    }

    /// The platform's flagship core contracts.
    #[must_use]
    pub fn flagship() -> Self {
        Self::new([
            ("OG", "0x059edd72cd353df5106d2b9cc5ab83a52287ac3a"),
            ("V2", "0xa7d8d9ef8d8ce8992df33d8b8cf4aebabd5bd270"),
        ])
    }

    /// Iterate contract addresses in registry order. Names are registry
    /// internals and are not exposed to callers.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, addr)| addr.as_str())
    }

    /// Number of contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the registry has no contracts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ContractRegistry;
    use crate::error::SubgraphError;

    #[test]
    fn from_json_preserves_key_order() {
        let registry = ContractRegistry::from_json(
            r#"{ "OG": "0xaaa", "V2": "0xbbb", "V3": "0xccc" }"#,
        )
        .expect("valid registry json");
        let addresses: Vec<&str> = registry.addresses().collect();
        assert_eq!(addresses, vec!["0xaaa", "0xbbb", "0xccc"]);
    }

    #[test]
    fn from_json_rejects_non_string_address() {
        let err = ContractRegistry::from_json(r#"{ "OG": 42 }"#)
            .expect_err("non-string address should fail");
        assert!(matches!(err, SubgraphError::Json(_)));
    }

    #[test]
    fn flagship_has_two_contracts() {
        let registry = ContractRegistry::flagship();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }
}
