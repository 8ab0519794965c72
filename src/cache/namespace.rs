//! CacheNamespace Registry
//!
//! Enumerates the logical cache partitions together with their versioned
//! name, item-count ceiling and max-age. The naming contract
//! `<prefix>-<version>` must stay bit-exact across releases: activation
//! decides which on-disk partitions survive purely by name comparison.

use std::time::Duration;

// == Namespace Prefix ==
/// The four fixed resource classes the engine partitions its store into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespacePrefix {
    /// Application shell, scripts and stylesheets (pre-seeded at install)
    Static,
    /// Upstream API responses
    Api,
    /// Images and fonts
    Images,
    /// Everything else worth keeping
    Runtime,
}

impl NamespacePrefix {
    /// All known prefixes, used when sweeping stale namespaces.
    pub const ALL: [NamespacePrefix; 4] = [
        NamespacePrefix::Static,
        NamespacePrefix::Api,
        NamespacePrefix::Images,
        NamespacePrefix::Runtime,
    ];

    /// Wire name of the prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            NamespacePrefix::Static => "static",
            NamespacePrefix::Api => "api",
            NamespacePrefix::Images => "images",
            NamespacePrefix::Runtime => "runtime",
        }
    }

    /// Item-count ceiling; None means unbounded (the static namespace is
    /// pre-seeded and never trimmed).
    pub fn max_items(&self) -> Option<usize> {
        match self {
            NamespacePrefix::Static => None,
            NamespacePrefix::Api => Some(100),
            NamespacePrefix::Images => Some(200),
            NamespacePrefix::Runtime => Some(50),
        }
    }

    /// Age after which a stored entry is considered stale; None means the
    /// namespace relies on size eviction only.
    pub fn max_age(&self) -> Option<Duration> {
        const HOUR: u64 = 60 * 60;
        const DAY: u64 = 24 * HOUR;
        match self {
            NamespacePrefix::Static => Some(Duration::from_secs(7 * DAY)),
            NamespacePrefix::Api => Some(Duration::from_secs(DAY)),
            NamespacePrefix::Images => Some(Duration::from_secs(30 * DAY)),
            NamespacePrefix::Runtime => None,
        }
    }
}

// == Namespace ==
/// A versioned logical partition of the cache store.
///
/// Two namespaces are equal iff their names are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Resource class this namespace holds
    pub prefix: NamespacePrefix,
    /// Full versioned name, `<prefix>-<version>`
    pub name: String,
    /// Item-count ceiling (None = unbounded)
    pub max_items: Option<usize>,
    /// Entry max-age (None = size eviction only)
    pub max_age: Option<Duration>,
}

// == Namespace Registry ==
/// Computes namespace descriptors for the current version tag and decides
/// which on-disk names are stale leftovers from a previous version.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    version: String,
}

impl NamespaceRegistry {
    /// Creates a registry for the given global version tag.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// The current global version tag.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Descriptor for one partition under the current version.
    pub fn get(&self, prefix: NamespacePrefix) -> Namespace {
        Namespace {
            prefix,
            name: format!("{}-{}", prefix.as_str(), self.version),
            max_items: prefix.max_items(),
            max_age: prefix.max_age(),
        }
    }

    /// Descriptors for all four partitions under the current version.
    pub fn all(&self) -> Vec<Namespace> {
        NamespacePrefix::ALL.iter().map(|p| self.get(*p)).collect()
    }

    /// True if `name` carries one of the four known prefixes but does not
    /// match the name computed for the current version.
    pub fn is_stale(&self, name: &str) -> bool {
        NamespacePrefix::ALL.iter().any(|p| {
            name.starts_with(&format!("{}-", p.as_str())) && name != self.get(*p).name
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_names_bit_exact() {
        let registry = NamespaceRegistry::new("v1");
        assert_eq!(registry.get(NamespacePrefix::Static).name, "static-v1");
        assert_eq!(registry.get(NamespacePrefix::Api).name, "api-v1");
        assert_eq!(registry.get(NamespacePrefix::Images).name, "images-v1");
        assert_eq!(registry.get(NamespacePrefix::Runtime).name, "runtime-v1");
    }

    #[test]
    fn test_ceilings_match_contract() {
        assert_eq!(NamespacePrefix::Static.max_items(), None);
        assert_eq!(NamespacePrefix::Api.max_items(), Some(100));
        assert_eq!(NamespacePrefix::Images.max_items(), Some(200));
        assert_eq!(NamespacePrefix::Runtime.max_items(), Some(50));
    }

    #[test]
    fn test_max_ages_match_contract() {
        let day = Duration::from_secs(24 * 60 * 60);
        assert_eq!(NamespacePrefix::Api.max_age(), Some(day));
        assert_eq!(NamespacePrefix::Images.max_age(), Some(30 * day));
        assert_eq!(NamespacePrefix::Static.max_age(), Some(7 * day));
        assert_eq!(NamespacePrefix::Runtime.max_age(), None);
    }

    #[test]
    fn test_stale_detection() {
        let registry = NamespaceRegistry::new("v2");

        assert!(registry.is_stale("static-v1"));
        assert!(registry.is_stale("api-v1"));
        assert!(!registry.is_stale("static-v2"));
        assert!(!registry.is_stale("api-v2"));
        // Unknown prefixes are left alone
        assert!(!registry.is_stale("thumbnails-v1"));
        assert!(!registry.is_stale("unrelated"));
    }

    #[test]
    fn test_equality_is_by_name() {
        let a = NamespaceRegistry::new("v1").get(NamespacePrefix::Api);
        let b = NamespaceRegistry::new("v1").get(NamespacePrefix::Api);
        let c = NamespaceRegistry::new("v2").get(NamespacePrefix::Api);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_all_returns_four_partitions() {
        let registry = NamespaceRegistry::new("v1");
        let all = registry.all();
        assert_eq!(all.len(), 4);
        assert!(all.iter().any(|n| n.name == "runtime-v1"));
    }
}
