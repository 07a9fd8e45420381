use std::sync::Arc;
use std::time::Duration;

use common::cache::{CollectionCache, TaskScope};
use common::client::WorkforceClient;
use common::config::Settings;
use common::errors::ApiClientError;
use common::models::{Foreman, Task, Technician};
use common::roster::RosterIndex;

/// Application state shared across all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: WorkforceClient,
    pub cache: Arc<CollectionCache>,
    pub config: Arc<Settings>,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(client: WorkforceClient, config: Settings) -> Self {
        let ttl = Duration::from_secs(config.ui.cache_ttl_seconds);
        Self {
            client,
            cache: Arc::new(CollectionCache::new(ttl)),
            config: Arc::new(config),
        }
    }

    /// Foremen collection, read through the cache
    pub async fn foremen(&self) -> Result<Arc<Vec<Foreman>>, ApiClientError> {
        if let Some(cached) = self.cache.foremen().await {
            return Ok(cached);
        }
        let fetched = self.client.list_foremen().await?;
        Ok(self.cache.store_foremen(fetched).await)
    }

    /// Technicians collection, read through the cache
    pub async fn technicians(&self) -> Result<Arc<Vec<Technician>>, ApiClientError> {
        if let Some(cached) = self.cache.technicians().await {
            return Ok(cached);
        }
        let fetched = self.client.list_technicians().await?;
        Ok(self.cache.store_technicians(fetched).await)
    }

    /// Task collection for the given scope, read through the cache. A cached
    /// slot fetched for a different scope is never served.
    pub async fn tasks(&self, scope: TaskScope) -> Result<Arc<Vec<Task>>, ApiClientError> {
        if let Some(cached) = self.cache.tasks(scope).await {
            return Ok(cached);
        }
        let fetched = match scope {
            TaskScope::All => self.client.list_tasks().await?,
            TaskScope::Technician(id) => self.client.list_technician_tasks(id).await?,
        };
        Ok(self.cache.store_tasks(scope, fetched).await)
    }

    /// Id-to-entity maps for display joins in the task table
    pub async fn roster(&self) -> Result<RosterIndex, ApiClientError> {
        let foremen = self.foremen().await?;
        let technicians = self.technicians().await?;
        Ok(RosterIndex::new(&foremen, &technicians))
    }
}
