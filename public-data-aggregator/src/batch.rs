//! Single, parallel and sequential fetch strategies.
//!
//! This is where a transient failure turns into mock data (or not, under
//! [`FallbackPolicy::Surface`]). Batch strategies never fail as a whole: each
//! request settles into its own [`FetchResult`] slot.

use crate::orchestrator::Orchestrator;
use crate::types::{FallbackPolicy, FetchResult, QueryOptions, Result, SourceRequest};
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

pub async fn fetch_single(
    orchestrator: &Orchestrator,
    source_id: &str,
    options: &QueryOptions,
) -> Result<FetchResult> {
    let error = match orchestrator.fetch(source_id, options).await {
        Ok(fetched) => return Ok(FetchResult::success(source_id, fetched.envelope, fetched.origin)),
        Err(e) => e,
    };

    if !error.is_transient() || orchestrator.fallback_policy() == FallbackPolicy::Surface {
        return Err(error);
    }

    warn!("Fetching {} failed ({}), falling back to mock data", source_id, error);
    let envelope = orchestrator
        .mock_envelope(source_id, &error.fallback_notice())
        .await?;
    Ok(FetchResult::fallback(source_id, envelope, error.kind(), error.to_string()))
}

async fn settle(orchestrator: &Orchestrator, request: &SourceRequest) -> FetchResult {
    match fetch_single(orchestrator, &request.source_id, &request.options).await {
        Ok(result) => result,
        Err(e) => FetchResult::failure(&request.source_id, e.to_string()),
    }
}

/// Issue every request before awaiting any; results keep input order.
pub async fn fetch_parallel(orchestrator: &Orchestrator, requests: &[SourceRequest]) -> Vec<FetchResult> {
    if requests.is_empty() {
        return Vec::new();
    }

    let batch_id = Uuid::new_v4();
    info!("Batch {}: fetching {} sources in parallel", batch_id, requests.len());

    let results = join_all(requests.iter().map(|request| settle(orchestrator, request))).await;

    info!(
        "Batch {}: {}/{} sources succeeded",
        batch_id,
        results.iter().filter(|r| r.succeeded).count(),
        results.len()
    );
    results
}

/// One request at a time, each fully settled before the next is issued.
pub async fn fetch_sequential(orchestrator: &Orchestrator, requests: &[SourceRequest]) -> Vec<FetchResult> {
    if requests.is_empty() {
        return Vec::new();
    }

    let batch_id = Uuid::new_v4();
    info!("Batch {}: fetching {} sources sequentially", batch_id, requests.len());

    let mut results = Vec::with_capacity(requests.len());
    for request in requests {
        results.push(settle(orchestrator, request).await);
    }

    info!(
        "Batch {}: {}/{} sources succeeded",
        batch_id,
        results.iter().filter(|r| r.succeeded).count(),
        results.len()
    );
    results
}
