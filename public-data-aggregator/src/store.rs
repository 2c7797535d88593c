use crate::batch;
use crate::orchestrator::Orchestrator;
use crate::types::{
    BatchStatus, FetchResult, QueryOptions, ResponseEnvelope, Result, SourcePhase, SourceRequest,
    SourceState,
};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Default)]
struct StoreInner {
    sources: HashMap<String, SourceState>,
    batch: BatchStatus,
    batches_in_flight: usize,
}

/// Owns the last-known state of every source and drives loads through the
/// batch strategies.
///
/// The lock is only held for state transitions, never across a fetch, so
/// concurrent loads interleave freely; the last write for a source wins.
pub struct SourceStore {
    orchestrator: Orchestrator,
    inner: RwLock<StoreInner>,
}

impl SourceStore {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            inner: RwLock::new(StoreInner::default()),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn has_api_key(&self) -> bool {
        self.orchestrator.access().has_api_key()
    }

    /// Load one source. Unknown ids are rejected before any state is touched.
    pub async fn load_single(&self, source_id: &str, options: &QueryOptions) -> Result<FetchResult> {
        self.orchestrator.registry().resolve(source_id)?;

        self.inner
            .write()
            .await
            .sources
            .entry(source_id.to_string())
            .or_default()
            .begin_request();

        let outcome = batch::fetch_single(&self.orchestrator, source_id, options).await;

        let mut inner = self.inner.write().await;
        let state = inner.sources.entry(source_id.to_string()).or_default();
        match &outcome {
            Ok(result) => apply(state, result),
            Err(e) => state.fail(e.to_string()),
        }
        outcome
    }

    /// Load several sources concurrently.
    pub async fn load_multiple(&self, requests: &[SourceRequest]) -> Vec<FetchResult> {
        self.begin_batch(requests).await;
        let results = batch::fetch_parallel(&self.orchestrator, requests).await;
        self.finish_batch(&results).await;
        results
    }

    /// Load several sources one after another.
    pub async fn load_sequential(&self, requests: &[SourceRequest]) -> Vec<FetchResult> {
        self.begin_batch(requests).await;
        let results = batch::fetch_sequential(&self.orchestrator, requests).await;
        self.finish_batch(&results).await;
        results
    }

    pub async fn retry(&self, source_id: &str, options: &QueryOptions) -> Result<FetchResult> {
        self.load_single(source_id, options).await
    }

    /// Re-fetch, in parallel, every source that has been requested before.
    /// Does nothing (and returns no results) if nothing has been requested.
    pub async fn retry_all(&self) -> Vec<FetchResult> {
        let mut source_ids: Vec<String> = self.inner.read().await.sources.keys().cloned().collect();

        if source_ids.is_empty() {
            warn!("retry_all: no previously fetched sources to retry");
            return Vec::new();
        }

        let registry = self.orchestrator.registry();
        source_ids.sort_by_key(|id| registry.position(id));
        info!("Retrying {} sources", source_ids.len());

        let requests: Vec<SourceRequest> = source_ids.into_iter().map(SourceRequest::new).collect();
        self.load_multiple(&requests).await
    }

    pub async fn get_data(&self, source_id: &str) -> Option<ResponseEnvelope> {
        self.inner
            .read()
            .await
            .sources
            .get(source_id)
            .and_then(|s| s.data().cloned())
    }

    pub async fn get_loading_state(&self, source_id: &str) -> bool {
        self.inner
            .read()
            .await
            .sources
            .get(source_id)
            .is_some_and(SourceState::is_loading)
    }

    pub async fn get_error_state(&self, source_id: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .sources
            .get(source_id)
            .and_then(|s| s.error_message().map(str::to_string))
    }

    pub async fn get_phase(&self, source_id: &str) -> SourcePhase {
        self.inner
            .read()
            .await
            .sources
            .get(source_id)
            .map(SourceState::phase)
            .unwrap_or_default()
    }

    pub async fn get_source_state(&self, source_id: &str) -> Option<SourceState> {
        self.inner.read().await.sources.get(source_id).cloned()
    }

    /// Every source that currently holds data.
    pub async fn get_all_data(&self) -> BTreeMap<String, ResponseEnvelope> {
        self.inner
            .read()
            .await
            .sources
            .iter()
            .filter_map(|(id, state)| state.data().map(|data| (id.clone(), data.clone())))
            .collect()
    }

    /// Full copy of all per-source state, keyed by source id.
    pub async fn snapshot(&self) -> BTreeMap<String, SourceState> {
        self.inner
            .read()
            .await
            .sources
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    pub async fn batch_status(&self) -> BatchStatus {
        self.inner.read().await.batch.clone()
    }

    pub async fn clear_error(&self, source_id: &str) {
        if let Some(state) = self.inner.write().await.sources.get_mut(source_id) {
            state.clear_error();
        }
    }

    pub async fn clear_all_errors(&self) {
        let mut inner = self.inner.write().await;
        inner.batch.error = None;
        for state in inner.sources.values_mut() {
            state.clear_error();
        }
    }

    /// Forget a source entirely; it is `Idle` afterwards.
    pub async fn clear_data(&self, source_id: &str) {
        self.inner.write().await.sources.remove(source_id);
    }

    pub async fn clear_all_data(&self) {
        let mut inner = self.inner.write().await;
        inner.sources.clear();
        inner.batch = BatchStatus {
            loading: inner.batches_in_flight > 0,
            error: None,
        };
    }

    async fn begin_batch(&self, requests: &[SourceRequest]) {
        let registry = self.orchestrator.registry();
        let mut inner = self.inner.write().await;
        // A batch started while others are outstanding keeps their error.
        if inner.batches_in_flight == 0 {
            inner.batch.error = None;
        }
        inner.batches_in_flight += 1;
        inner.batch.loading = true;
        for request in requests.iter().filter(|r| registry.contains(&r.source_id)) {
            inner
                .sources
                .entry(request.source_id.clone())
                .or_default()
                .begin_request();
        }
    }

    async fn finish_batch(&self, results: &[FetchResult]) {
        let registry = self.orchestrator.registry();
        let mut inner = self.inner.write().await;

        for result in results.iter().filter(|r| registry.contains(&r.source_id)) {
            let state = inner.sources.entry(result.source_id.clone()).or_default();
            apply(state, result);
        }

        inner.batches_in_flight = inner.batches_in_flight.saturating_sub(1);
        inner.batch.loading = inner.batches_in_flight > 0;
        if !results.is_empty() && results.iter().all(|r| !r.succeeded) {
            inner.batch.error = Some(format!("모든 API 호출이 실패했습니다 ({}건)", results.len()));
        }
    }
}

fn apply(state: &mut SourceState, result: &FetchResult) {
    match (&result.payload, result.succeeded) {
        (Some(payload), true) => state.complete(payload.clone()),
        _ => state.fail(
            result
                .error_message
                .clone()
                .unwrap_or_else(|| "데이터를 불러오는 중 오류가 발생했습니다.".to_string()),
        ),
    }
}
