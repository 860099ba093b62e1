/*!
 * Container and Pool Configuration
 *
 * Plain serde-friendly settings for the worker pool and the concurrent table
 */

use crate::core::errors::{PoolError, PoolResult, TableError, TableResult};
use crate::core::limits::{DEFAULT_TABLE_BUCKETS, FALLBACK_WORKER_THREADS, WORKER_THREAD_PREFIX};
use serde::{Deserialize, Serialize};

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker threads, fixed for the pool's lifetime
    pub workers: usize,
    /// Thread name prefix; each worker is named `{prefix}-{index}`
    pub thread_name_prefix: String,
    /// Stack size override for worker threads, in bytes
    pub stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(FALLBACK_WORKER_THREADS);
        Self {
            workers,
            thread_name_prefix: WORKER_THREAD_PREFIX.to_string(),
            stack_size: None,
        }
    }
}

impl PoolConfig {
    /// Default configuration with an explicit worker count
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    /// Check the configuration before any thread is started
    pub fn validate(&self) -> PoolResult<()> {
        if self.workers == 0 {
            return Err(PoolError::InvalidConfig(
                "worker count must be at least 1".into(),
            ));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::InvalidConfig(
                "thread name prefix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Concurrent table configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Bucket count before the first resize
    pub initial_buckets: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_TABLE_BUCKETS,
        }
    }
}

impl TableConfig {
    pub const fn with_buckets(initial_buckets: usize) -> Self {
        Self { initial_buckets }
    }

    /// Check the configuration before any bucket is allocated
    pub fn validate(&self) -> TableResult<()> {
        if self.initial_buckets == 0 {
            return Err(TableError::InvalidConfig(
                "initial bucket count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_validation() {
        assert!(PoolConfig::with_workers(2).validate().is_ok());
        assert!(matches!(
            PoolConfig::with_workers(0).validate(),
            Err(PoolError::InvalidConfig(_))
        ));

        let config = PoolConfig {
            thread_name_prefix: String::new(),
            ..PoolConfig::with_workers(1)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults() {
        assert!(PoolConfig::default().workers >= 1);
        assert_eq!(PoolConfig::default().thread_name_prefix, WORKER_THREAD_PREFIX);
        assert_eq!(TableConfig::default().initial_buckets, 53);
    }

    #[test]
    fn test_table_config_validation() {
        assert!(TableConfig::default().validate().is_ok());
        assert_eq!(
            TableConfig::with_buckets(0).validate(),
            Err(TableError::InvalidConfig(
                "initial bucket count must be at least 1".into()
            ))
        );
    }
}
