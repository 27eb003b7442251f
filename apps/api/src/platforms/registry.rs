use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::platforms::adapter::{MappedAdapter, PlatformAdapter};
use crate::platforms::credentials::PlatformCredentials;
use crate::platforms::mapping::PLATFORMS;

/// Adapters for every platform with a complete credential set. Built once at
/// startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct PlatformRegistry {
    adapters: Vec<Arc<dyn PlatformAdapter>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStatus {
    pub platform: &'static str,
    pub name: &'static str,
    pub configured: bool,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatusReport {
    pub platforms: Vec<PlatformStatus>,
    pub total_platforms: usize,
    pub configured_count: usize,
}

impl PlatformRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_credentials(
        credentials: &PlatformCredentials,
        http: reqwest::Client,
        apply_url: &str,
    ) -> Self {
        let mut registry = Self::empty();
        for spec in PLATFORMS.iter() {
            if let Some(creds) = credentials.get(spec.id) {
                registry = registry.with_adapter(Arc::new(MappedAdapter::new(
                    spec,
                    creds.clone(),
                    http.clone(),
                    apply_url,
                )));
            }
        }
        info!(
            "Platform registry ready: [{}]",
            registry.list_available().join(", ")
        );
        registry
    }

    /// Registers `adapter`, replacing any adapter with the same platform id.
    pub fn with_adapter(mut self, adapter: Arc<dyn PlatformAdapter>) -> Self {
        self.adapters
            .retain(|existing| existing.platform_id() != adapter.platform_id());
        self.adapters.push(adapter);
        self
    }

    pub fn get(&self, platform_id: &str) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters
            .iter()
            .find(|a| a.platform_id() == platform_id)
            .cloned()
    }

    pub fn is_configured(&self, platform_id: &str) -> bool {
        self.get(platform_id).is_some()
    }

    pub fn list_available(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.platform_id()).collect()
    }

    /// Configuration state of every known platform.
    pub fn status(&self) -> PlatformStatusReport {
        let platforms: Vec<PlatformStatus> = PLATFORMS
            .iter()
            .map(|spec| {
                let configured = self.is_configured(spec.id);
                PlatformStatus {
                    platform: spec.id,
                    name: spec.name,
                    configured,
                    status: if configured { "ready" } else { "needs_api_key" },
                }
            })
            .collect();

        PlatformStatusReport {
            total_platforms: platforms.len(),
            configured_count: platforms.iter().filter(|p| p.configured).count(),
            platforms,
        }
    }
}
