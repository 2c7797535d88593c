// Shared fixtures for the integration tests
#![allow(dead_code)]

pub use public_data_aggregator::{
    AccessConfig, ExecutionMode, FallbackPolicy, FetchConfig, Orchestrator, SourceStore,
};
use serde_json::{json, Value};
use std::sync::Once;

pub const PARKING_PROXY_PATH: &str = "/api/parking-data.php";
pub const LIBRARY_PROXY_PATH: &str = "/api/library-data.php";
pub const PARKING_DIRECT_PATH: &str = "/15096534/v1/uddi:d91498fc-5229-4d2d-8e72-df412085242f";

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

/// Short mock latency so fallback paths don't slow the suite down.
pub fn fast_config() -> FetchConfig {
    FetchConfig {
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        mock_latency_ms: 10,
        ..FetchConfig::default()
    }
}

pub fn surfacing_config() -> FetchConfig {
    FetchConfig {
        fallback: FallbackPolicy::Surface,
        ..fast_config()
    }
}

/// Development mode without a key: everything is mock data.
pub fn mock_access() -> AccessConfig {
    AccessConfig::default()
}

pub fn proxy_access(origin: &str) -> AccessConfig {
    AccessConfig {
        use_proxy: true,
        proxy_origin: origin.to_string(),
        ..AccessConfig::default()
    }
}

pub fn direct_access(api_base_url: &str, key: &str) -> AccessConfig {
    AccessConfig {
        api_key: Some(key.to_string()),
        api_base_url: api_base_url.to_string(),
        ..AccessConfig::default()
    }
}

pub fn orchestrator(access: AccessConfig, config: FetchConfig) -> Orchestrator {
    Orchestrator::new(access, config).expect("HTTP client should build")
}

pub fn store(access: AccessConfig, config: FetchConfig) -> SourceStore {
    SourceStore::new(orchestrator(access, config))
}

/// A valid envelope body with one parking record per name.
pub fn envelope_json(names: &[&str]) -> Value {
    let data: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "순번": i + 1, "주차장명": name, "면수": 20 }))
        .collect();
    json!({
        "page": 1,
        "perPage": 10,
        "totalCount": names.len() + 10,
        "currentCount": names.len(),
        "matchCount": names.len(),
        "data": data,
    })
}
