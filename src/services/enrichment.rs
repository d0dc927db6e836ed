use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinHandle};

use crate::{
    error::{AppError, AppResult},
    models::MovieRecord,
    services::providers::MetadataProvider,
};

/// A spawned lookup that is aborted if dropped before it is joined
struct Lookup {
    title: String,
    task: JoinHandle<AppResult<MovieRecord>>,
}

impl Lookup {
    async fn join(&mut self) -> AppResult<MovieRecord> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(AppError::Internal(e.to_string())),
        }
    }
}

impl Drop for Lookup {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Resolves candidate titles to metadata records in parallel
///
/// Every lookup is spawned before any is awaited, and results are collected in
/// request order regardless of which task finishes first. A semaphore bounds
/// how many lookups hit the provider at once.
#[derive(Clone)]
pub struct Enricher {
    metadata: Arc<dyn MetadataProvider>,
    permits: Arc<Semaphore>,
}

impl Enricher {
    pub fn new(metadata: Arc<dyn MetadataProvider>, max_concurrent: usize) -> Self {
        Self {
            metadata,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    fn spawn_lookups(&self, titles: Vec<String>) -> Vec<Lookup> {
        titles
            .into_iter()
            .map(|title| {
                let provider = self.metadata.clone();
                let permits = self.permits.clone();
                let key = title.clone();
                let task = tokio::spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|e| AppError::Internal(e.to_string()))?;
                    provider.lookup(&key).await
                });
                Lookup { title, task }
            })
            .collect()
    }

    /// All-or-nothing join: the first failure in title order aborts the rest
    ///
    /// Dropping the returned future aborts every lookup still running.
    pub async fn resolve_all(&self, titles: Vec<String>) -> AppResult<Vec<MovieRecord>> {
        let pending = self.spawn_lookups(titles);
        let mut records = Vec::with_capacity(pending.len());

        for mut lookup in pending {
            match lookup.join().await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::error!(title = %lookup.title, error = %e, "Metadata lookup failed, aborting enrichment");
                    return Err(AppError::Enrichment {
                        title: std::mem::take(&mut lookup.title),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(records)
    }

    /// Best-effort join: failed lookups are logged and skipped
    pub async fn resolve_available(&self, titles: Vec<String>) -> Vec<MovieRecord> {
        let mut records = Vec::new();
        let mut failures = 0;

        for mut lookup in self.spawn_lookups(titles) {
            match lookup.join().await {
                Ok(record) => records.push(record),
                Err(e) => {
                    failures += 1;
                    tracing::error!(title = %lookup.title, error = %e, "Metadata lookup failed");
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                success_count = records.len(),
                error_count = failures,
                "Partial metadata fetch failure"
            );
        }

        records
    }
}
