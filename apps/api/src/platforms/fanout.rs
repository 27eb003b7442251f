//! Multi-platform fan-out.
//!
//! One result per requested id, in request order. Adapter calls run as separate
//! tasks gated by a semaphore; with the default limit of 1 they run strictly one
//! after another. A panicking adapter only fails its own slot.
//!
//! Dropping the fan-out future (a client disconnect, for example) aborts every
//! adapter task still in flight, so no posting outlives its request.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::platforms::models::{JobPosting, PostResult};
use crate::platforms::registry::PlatformRegistry;

pub const DEFAULT_MAX_CONCURRENCY: usize = 1;

enum Pending {
    Ready(PostResult),
    Running(String, JoinHandle<PostResult>),
}

/// Aborts the tasks it still holds when dropped. Finished tasks ignore `abort`.
struct PendingPosts(Vec<Pending>);

impl Drop for PendingPosts {
    fn drop(&mut self) {
        for slot in &self.0 {
            if let Pending::Running(_, handle) = slot {
                handle.abort();
            }
        }
    }
}

#[derive(Clone)]
pub struct FanoutManager {
    registry: Arc<PlatformRegistry>,
    max_concurrency: usize,
}

impl FanoutManager {
    pub fn new(registry: Arc<PlatformRegistry>) -> Self {
        Self {
            registry,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    pub async fn post_to_platform(&self, platform_id: &str, job: &JobPosting) -> PostResult {
        let ids = [platform_id.to_string()];
        self.post_to_multiple_platforms(&ids, job)
            .await
            .pop()
            .unwrap_or_else(|| PostResult::failure(platform_id, "no result produced"))
    }

    pub async fn post_to_multiple_platforms(
        &self,
        platform_ids: &[String],
        job: &JobPosting,
    ) -> Vec<PostResult> {
        let job = Arc::new(job.clone());
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut pending = PendingPosts(Vec::with_capacity(platform_ids.len()));

        for id in platform_ids {
            let Some(adapter) = self.registry.get(id) else {
                warn!("Skipping '{id}': platform not configured");
                pending.0.push(Pending::Ready(PostResult::not_configured(id)));
                continue;
            };

            let permit = match permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    pending.0.push(Pending::Ready(PostResult::failure(id, e.to_string())));
                    continue;
                }
            };

            let job = job.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                adapter.post_job(&job).await
            });
            pending.0.push(Pending::Running(id.clone(), handle));
        }

        let mut results = Vec::with_capacity(pending.0.len());
        for slot in pending.0.iter_mut() {
            let result = match slot {
                Pending::Ready(result) => result.clone(),
                Pending::Running(id, handle) => match handle.await {
                    Ok(mut result) => {
                        result.platform = id.clone();
                        result
                    }
                    Err(e) => {
                        error!("Adapter task for '{id}' failed: {e}");
                        PostResult::failure(id.as_str(), format!("adapter task failed: {e}"))
                    }
                },
            };
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            "Fan-out of '{}' finished: {succeeded}/{} platforms succeeded",
            job.title,
            results.len()
        );
        results
    }
}
