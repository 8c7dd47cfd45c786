//! Configuration for the initial loaders.

use couchfall_core::{SyncOptions, RESERVED_ID_PREFIX};

/// Configuration for an [`InitialLoader`](crate::InitialLoader).
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Documents whose id starts with this character are dropped from
    /// bulk listings.
    pub reserved_prefix: char,
    /// Report a failed local get to the warning channel. The get still
    /// resolves to `None`.
    pub warn_on_local_get_failure: bool,
    /// Options used when starting replication.
    pub sync_options: SyncOptions,
}

impl LoaderConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            reserved_prefix: RESERVED_ID_PREFIX,
            warn_on_local_get_failure: false,
            sync_options: SyncOptions::live(),
        }
    }

    /// Sets the reserved id prefix.
    pub fn with_reserved_prefix(mut self, prefix: char) -> Self {
        self.reserved_prefix = prefix;
        self
    }

    /// Reports failed local gets as warnings.
    pub fn with_local_get_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_local_get_failure = enabled;
        self
    }

    /// Sets the replication options. `live` is forced on.
    pub fn with_sync_options(mut self, options: SyncOptions) -> Self {
        self.sync_options = SyncOptions {
            live: true,
            ..options
        };
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn loader_config_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.reserved_prefix, '_');
        assert!(!config.warn_on_local_get_failure);
        assert_eq!(config.sync_options, SyncOptions::live());
    }

    #[test]
    fn loader_config_builder() {
        let config = LoaderConfig::new()
            .with_reserved_prefix('$')
            .with_local_get_warnings(true)
            .with_sync_options(SyncOptions::default().with_timeout(Duration::from_secs(5)));

        assert_eq!(config.reserved_prefix, '$');
        assert!(config.warn_on_local_get_failure);
        assert!(config.sync_options.live);
        assert_eq!(config.sync_options.timeout, Some(Duration::from_secs(5)));
    }
}
