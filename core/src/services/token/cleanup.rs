//! Expired token cleanup service
//!
//! Sweeps the token store on a fixed interval. Validation performs its own
//! expiry check, so a sweep that lags behind by a few milliseconds never lets
//! an expired token through.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use bp_shared::config::token::TokenConfig;

use crate::errors::DomainError;
use crate::repositories::TokenStore;

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300, // Run every 5 minutes
            enabled: true,
        }
    }
}

impl From<&TokenConfig> for TokenCleanupConfig {
    fn from(config: &TokenConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds.max(1),
            enabled: config.cleanup_enabled,
        }
    }
}

/// Service for removing expired tokens from the store
pub struct TokenCleanupService<S: TokenStore + 'static> {
    store: Arc<S>,
    config: TokenCleanupConfig,
}

impl<S: TokenStore> TokenCleanupService<S> {
    /// Create a new token cleanup service
    pub fn new(store: Arc<S>, config: TokenCleanupConfig) -> Self {
        Self { store, config }
    }

    /// Run a single cleanup cycle
    ///
    /// Idempotent: a second run right after the first removes nothing.
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of cleanup operations
    /// * `Err(DomainError)` - If the store failed
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        let removed = self.store.remove_expired(Utc::now()).await?;

        if removed > 0 {
            info!(removed, "Removed expired payment tokens");
        } else {
            debug!("No expired payment tokens to remove");
        }

        Ok(CleanupResult {
            expired_tokens_deleted: removed,
        })
    }

    /// Start the cleanup service as a background task
    ///
    /// The task runs a cycle immediately, then every `interval_seconds`, until
    /// `shutdown` carries `true` or its sender is dropped.
    ///
    /// # Returns
    /// The task handle, or `None` when cleanup is disabled
    pub fn start_background_task(
        self: Arc<Self>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Token cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        if let Err(e) = self.run_cleanup().await {
                            error!("Token cleanup cycle failed: {}", e);
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Token cleanup service stopped");
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired tokens deleted
    pub expired_tokens_deleted: usize,
}
