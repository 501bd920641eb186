//! Pool sizing and acquisition settings.

use std::time::Duration;

use crate::error::{DbError, Result};

/// Connections kept open per pool unless overridden.
pub const DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// Upper connection bound per pool unless overridden.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 40;

const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Sizing bounds and acquire timeout for one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: DEFAULT_MIN_CONNECTIONS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Reject bounds the underlying pool cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(DbError::config("max_connections must be positive"));
        }
        if self.max_connections < self.min_connections {
            return Err(DbError::config(
                "max_connections must be >= min_connections",
            ));
        }
        Ok(())
    }
}
