//! Filesystem serving configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the flatfs mount.
///
/// All fields have defaults so a missing or partial TOML section works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatFsConfig {
    /// Filesystem mount point.
    #[serde(default)]
    pub mountpoint: String,

    /// Whether to request kernel page caching during init. Always safe
    /// here: content never changes after the table is sealed.
    #[serde(default = "default_true")]
    pub kernel_cache: bool,

    /// Attribute cache timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub attr_timeout_secs: u64,

    /// Entry (lookup) cache timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub entry_timeout_secs: u64,

    /// Maximum readahead in bytes.
    #[serde(default = "default_max_readahead")]
    pub max_readahead: u32,

    /// Maximum number of entries the file table accepts during population.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_readahead() -> u32 {
    131072
}

fn default_max_entries() -> usize {
    1000
}

impl Default for FlatFsConfig {
    fn default() -> Self {
        FlatFsConfig {
            mountpoint: String::new(),
            kernel_cache: default_true(),
            attr_timeout_secs: default_timeout_secs(),
            entry_timeout_secs: default_timeout_secs(),
            max_readahead: default_max_readahead(),
            max_entries: default_max_entries(),
        }
    }
}

impl FlatFsConfig {
    /// The attribute cache timeout as a `Duration`.
    pub fn attr_timeout(&self) -> Duration {
        Duration::from_secs(self.attr_timeout_secs)
    }

    /// The entry cache timeout as a `Duration`.
    pub fn entry_timeout(&self) -> Duration {
        Duration::from_secs(self.entry_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = FlatFsConfig::default();
        assert_eq!(cfg.mountpoint, "");
        assert!(cfg.kernel_cache);
        assert_eq!(cfg.attr_timeout_secs, 30);
        assert_eq!(cfg.entry_timeout_secs, 30);
        assert_eq!(cfg.max_entries, 1000);
        assert_eq!(cfg.attr_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            mountpoint = "/mnt/flatfs"
            kernel_cache = false
            attr_timeout_secs = 60
            max_entries = 50
        "#;
        let cfg: FlatFsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.mountpoint, "/mnt/flatfs");
        assert!(!cfg.kernel_cache);
        assert_eq!(cfg.attr_timeout_secs, 60);
        // Unspecified fields fall back to defaults.
        assert_eq!(cfg.entry_timeout_secs, 30);
        assert_eq!(cfg.max_entries, 50);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: FlatFsConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.max_entries, 1000);
        assert!(cfg.kernel_cache);
    }
}
