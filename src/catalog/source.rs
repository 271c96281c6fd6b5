use std::path::PathBuf;

use crate::error::CatalogError;

use super::{CatalogData, CatalogFile};

/// Where catalog artifacts come from
///
/// The server loads through this trait at startup and on every reload, so the
/// storage behind the training artifacts can change without touching the
/// ranking code.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Reads and validates a complete catalog
    async fn load(&self) -> Result<CatalogData, CatalogError>;

    /// Human-readable origin for logging
    fn describe(&self) -> String;
}

/// Catalog stored as a single JSON document on local disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for JsonFileSource {
    async fn load(&self) -> Result<CatalogData, CatalogError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let data = CatalogFile::from_json(&json)?.into_items()?;

        tracing::debug!(
            path = %self.path.display(),
            items = data.items.len(),
            "Catalog file parsed"
        );

        Ok(data)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
