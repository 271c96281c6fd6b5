use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    catalog::{CatalogSnapshot, CatalogSource, SnapshotOptions},
    config::Config,
    error::{AppError, AppResult},
};

/// Request-independent ranking settings taken from [`Config`]
#[derive(Debug, Clone, Copy)]
pub struct RankingSettings {
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub noise_seed: u64,
}

impl From<&Config> for RankingSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_top_k: config.default_top_k,
            max_top_k: config.max_top_k,
            noise_seed: config.noise_seed,
        }
    }
}

/// Shared application state
///
/// The published catalog is an immutable snapshot behind a pointer swap.
/// Readers clone the `Arc` and drop the lock straight away, so a reload never
/// blocks ranking and in-flight requests keep the snapshot they started with.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<RwLock<Arc<CatalogSnapshot>>>,
    source: Arc<dyn CatalogSource>,
    settings: RankingSettings,
}

impl AppState {
    pub fn new(
        snapshot: CatalogSnapshot,
        source: Arc<dyn CatalogSource>,
        settings: RankingSettings,
    ) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Arc::new(snapshot))),
            source,
            settings,
        }
    }

    pub fn settings(&self) -> RankingSettings {
        self.settings
    }

    /// Currently published catalog
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.catalog.read().await.clone()
    }

    /// Replaces the published catalog
    pub async fn publish(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.catalog.write().await = snapshot.clone();
        snapshot
    }

    /// Loads the catalog again from its source and publishes it
    ///
    /// The new snapshot is fully built before the write lock is taken. On any
    /// failure the previous snapshot stays published.
    pub async fn reload(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let origin = self.source.describe();
        let data = self.source.load().await.map_err(|e| {
            tracing::error!(source = %origin, error = %e, "Catalog reload failed");
            AppError::from(e)
        })?;

        let options = SnapshotOptions::new(self.settings.noise_seed);
        let snapshot = tokio::task::spawn_blocking(move || CatalogSnapshot::build(data, options))
            .await
            .map_err(|e| AppError::Internal(format!("Snapshot build failed: {}", e)))?;

        let published = self.publish(snapshot).await;
        tracing::info!(
            source = %origin,
            items = published.len(),
            dimension = published.dimension(),
            "Catalog reloaded"
        );
        Ok(published)
    }

    /// Result size for a request, defaulting and bounds-checking `k`
    pub fn resolve_k(&self, k: Option<usize>) -> AppResult<usize> {
        let k = k.unwrap_or(self.settings.default_top_k);
        if k == 0 || k > self.settings.max_top_k {
            return Err(AppError::InvalidInput(format!(
                "k must be between 1 and {}",
                self.settings.max_top_k
            )));
        }
        Ok(k)
    }
}
