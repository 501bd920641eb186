//! An owned, synchronized cache of database pools.
//!
//! Call sites construct one `PoolRegistry` and pass it around; there is
//! no process-global state. The registry key is derived from the
//! parameters a pool is constructed from, and the cache lock is held
//! across construction, so concurrent first requests for one key build
//! exactly one pool. Entries live for the registry's lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::env::{self, ResolvedUrl};
use crate::error::Result;
use crate::pool::DatabasePool;
use crate::settings::PoolSettings;

/// Cache key: the resolved parameters a pool is constructed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PoolKey {
    url: String,
    min_connections: u32,
    max_connections: u32,
}

impl PoolKey {
    fn new(url: &str, settings: &PoolSettings) -> Self {
        Self {
            url: url.to_string(),
            min_connections: settings.min_connections,
            max_connections: settings.max_connections,
        }
    }
}

/// Shared handle to a set of named pools. Cloning yields another handle
/// to the same cache.
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: Arc<Mutex<HashMap<PoolKey, Arc<DatabasePool>>>>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered pools.
    pub async fn len(&self) -> usize {
        self.pools.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pools.lock().await.is_empty()
    }

    /// Open a pool for `url`.
    ///
    /// With `cached` set, an existing pool for the same (url, bounds)
    /// key is reused; otherwise a new one is constructed, registered,
    /// and returned. With `cached` unset the pool is always fresh and
    /// never registered.
    pub async fn open(
        &self,
        url: &str,
        name: Option<&str>,
        settings: PoolSettings,
        cached: bool,
    ) -> Result<Arc<DatabasePool>> {
        self.open_inner(url, name, settings, cached, false).await
    }

    /// [`open`](Self::open) over a lazily-connecting pool.
    pub async fn open_lazy(
        &self,
        url: &str,
        name: Option<&str>,
        settings: PoolSettings,
        cached: bool,
    ) -> Result<Arc<DatabasePool>> {
        self.open_inner(url, name, settings, cached, true).await
    }

    async fn open_inner(
        &self,
        url: &str,
        name: Option<&str>,
        settings: PoolSettings,
        cached: bool,
        lazy: bool,
    ) -> Result<Arc<DatabasePool>> {
        if !cached {
            return Ok(Arc::new(Self::construct(url, name, settings, lazy).await?));
        }

        let key = PoolKey::new(url, &settings);
        let mut pools = self.pools.lock().await;
        if let Some(pool) = pools.get(&key) {
            debug!(pool = %pool.name(), "reusing registered pool");
            return Ok(pool.clone());
        }
        let pool = Arc::new(Self::construct(url, name, settings, lazy).await?);
        pools.insert(key, pool.clone());
        Ok(pool)
    }

    async fn construct(
        url: &str,
        name: Option<&str>,
        settings: PoolSettings,
        lazy: bool,
    ) -> Result<DatabasePool> {
        if lazy {
            DatabasePool::connect_lazy(url, name, settings)
        } else {
            DatabasePool::connect(url, name, settings).await
        }
    }

    /// Cached pool for a logical data-source name resolved from the
    /// environment (`.env` is loaded first if present). The pool is
    /// named after the logical name, or the environment key when no
    /// name was given.
    pub async fn database(&self, name: Option<&str>) -> Result<Arc<DatabasePool>> {
        self.database_with(name, PoolSettings::default()).await
    }

    /// [`database`](Self::database) with explicit pool settings.
    pub async fn database_with(
        &self,
        name: Option<&str>,
        settings: PoolSettings,
    ) -> Result<Arc<DatabasePool>> {
        dotenvy::dotenv().ok();
        let ResolvedUrl { url, key } = env::resolve(name)?;
        let display = name.map(str::to_string).unwrap_or(key);
        self.open(&url, Some(&display), settings, true).await
    }

    /// Close every registered pool.
    pub async fn close_all(&self) {
        let pools = self.pools.lock().await;
        for pool in pools.values() {
            pool.close().await;
        }
    }
}
