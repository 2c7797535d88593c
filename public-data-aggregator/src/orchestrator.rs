use crate::config::AccessConfig;
use crate::fetcher::Fetcher;
use crate::mock_data;
use crate::registry::SourceRegistry;
use crate::types::{
    DataOrigin, FallbackPolicy, FetchConfig, FetchError, MockReason, QueryOptions,
    ResponseEnvelope, Result, NOTICE_NO_CREDENTIAL,
};
use std::time::Duration;
use tracing::{debug, info};

/// How a single call reaches its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Proxy,
    Direct,
    Mock,
}

/// A successful fetch and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub envelope: ResponseEnvelope,
    pub origin: DataOrigin,
}

/// Picks proxy, direct or mock access per call and performs it.
///
/// Failures come back as `Err`; whether they get papered over with mock data
/// is decided by the batch layer.
pub struct Orchestrator {
    registry: SourceRegistry,
    access: AccessConfig,
    fetcher: Fetcher,
}

impl Orchestrator {
    pub fn new(access: AccessConfig, fetch_config: FetchConfig) -> Result<Self> {
        let registry = SourceRegistry::new(&access.base_path, &access.api_base_url);
        let fetcher = Fetcher::new(fetch_config)?;
        Ok(Self {
            registry,
            access,
            fetcher,
        })
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn access(&self) -> &AccessConfig {
        &self.access
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fetcher.config().fallback
    }

    /// Evaluated fresh on every call; nothing is cached.
    pub fn select_mode(&self) -> AccessMode {
        if self.access.routes_through_proxy() {
            AccessMode::Proxy
        } else if self.access.credential().is_some() {
            AccessMode::Direct
        } else {
            AccessMode::Mock
        }
    }

    pub async fn fetch(&self, source_id: &str, options: &QueryOptions) -> Result<Fetched> {
        let descriptor = self.registry.resolve(source_id)?;

        match self.select_mode() {
            AccessMode::Proxy => {
                let endpoint = format!(
                    "{}{}",
                    self.access.proxy_origin.trim_end_matches('/'),
                    descriptor.proxy_path
                );
                info!("Fetching {} through proxy", descriptor.display_name);
                let envelope = self.fetcher.fetch_proxy(&endpoint, options).await?;
                Ok(Fetched {
                    envelope,
                    origin: DataOrigin::Proxy,
                })
            }
            AccessMode::Direct => {
                let key = self.access.credential().unwrap_or_default();
                info!("Fetching {} directly", descriptor.display_name);
                let envelope = self
                    .fetcher
                    .fetch_direct(&descriptor.direct_url, key, options)
                    .await?;
                Ok(Fetched {
                    envelope,
                    origin: DataOrigin::Direct,
                })
            }
            AccessMode::Mock => {
                info!("No API key configured, using mock {}", descriptor.display_name);
                let envelope = self.mock_envelope(source_id, NOTICE_NO_CREDENTIAL).await?;
                Ok(Fetched {
                    envelope,
                    origin: DataOrigin::Mock(MockReason::NoCredential),
                })
            }
        }
    }

    /// The canned envelope for a source, delivered after the simulated latency.
    pub async fn mock_envelope(&self, source_id: &str, notice: &str) -> Result<ResponseEnvelope> {
        let envelope = mock_data::envelope_for(source_id)
            .ok_or_else(|| FetchError::UnknownSource { id: source_id.to_string() })?;

        let latency = Duration::from_millis(self.fetcher.config().mock_latency_ms);
        debug!("Simulating {:?} latency for mock {}", latency, source_id);
        tokio::time::sleep(latency).await;

        Ok(envelope.with_notice(notice))
    }
}
