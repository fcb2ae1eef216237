//! Unified storage interface
//!
//! The `Store` owns the file-backed key-value adapter and hands out the
//! two registries that share it. Opening a store bootstraps the admin
//! account on first run.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open()?;  // Creates data dir and admin on first run
//!
//! let catalogs = store.catalogs().list()?;
//! let user = store.identity().login("admin", "admin123")?;
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::catalogs::CatalogRegistry;
use crate::config::Config;
use crate::identity::IdentityStore;
use crate::storage::{FileKvStore, KvStore};
use crate::viewer::ZoomBounds;

/// Unified storage interface for Folheto
///
/// One ownership point for the shared key-value handle; consumers receive
/// the registries by reference instead of reaching for ambient state.
pub struct Store {
    config: Config,
    catalogs: CatalogRegistry,
    identity: IdentityStore,
}

impl Store {
    /// Open the store with configuration from the default location
    ///
    /// On first run this creates the data directory and the bootstrap
    /// admin account.
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let kv: Arc<dyn KvStore> = Arc::new(FileKvStore::new(&config.data_dir));

        let identity = IdentityStore::new(Arc::clone(&kv));
        identity
            .bootstrap()
            .context("Failed to bootstrap the admin account")?;

        let catalogs = CatalogRegistry::new(kv, &config);

        Ok(Self {
            config,
            catalogs,
            identity,
        })
    }

    /// The catalog registry
    pub fn catalogs(&self) -> &CatalogRegistry {
        &self.catalogs
    }

    /// The identity store
    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    /// The configuration this store was opened with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Viewer zoom bounds from the configuration
    pub fn zoom_bounds(&self) -> ZoomBounds {
        self.config.zoom_bounds()
    }
}
