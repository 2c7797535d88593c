use crate::types::{FetchConfig, FetchError, QueryOptions, ResponseEnvelope, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// HTTP side of the orchestrator: one GET per call, responses validated
/// against the envelope shape before they leave this module.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET a proxy script. The proxy reports its own failures as
    /// `{"error": true, "message": ...}`.
    pub async fn fetch_proxy(&self, endpoint: &str, options: &QueryOptions) -> Result<ResponseEnvelope> {
        let url = Url::parse_with_params(endpoint, options.query_pairs())?;
        let body = self.get_json(url).await?;

        if body.get("error").is_some_and(is_truthy) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("API 오류가 발생했습니다.")
                .to_string();
            warn!("Proxy {} reported an error: {}", endpoint, message);
            return Err(FetchError::UpstreamApi(message));
        }

        parse_envelope(body)
    }

    /// GET the third-party API with the service key injected.
    pub async fn fetch_direct(
        &self,
        endpoint: &str,
        service_key: &str,
        options: &QueryOptions,
    ) -> Result<ResponseEnvelope> {
        let mut params = vec![("serviceKey", service_key.to_string())];
        params.extend(options.query_pairs());
        params.push(("returnType", "json".to_string()));

        let url = Url::parse_with_params(endpoint, params)?;
        let body = self.get_json(url).await?;

        // A defined currentCount wins over anything else in the body.
        if body.get("currentCount").is_some() {
            return parse_envelope(body);
        }

        if let Some(code) = body.get("errorCode").filter(|c| is_truthy(c)) {
            let message = body
                .get("errorMessage")
                .and_then(Value::as_str)
                .unwrap_or("알 수 없는 오류");
            return Err(FetchError::UpstreamApi(format!(
                "API 오류: {} (코드: {})",
                message,
                display_value(code)
            )));
        }

        parse_envelope(body)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let start_time = Instant::now();
        let endpoint = redact(&url);
        debug!("GET {}", endpoint);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("{} answered HTTP {}", endpoint, status);
            return Err(FetchError::HttpStatus { status: status.as_u16() });
        }

        let text = response.text().await?;
        info!(
            "Fetched {} ({} bytes in {}ms)",
            endpoint,
            text.len(),
            start_time.elapsed().as_millis()
        );

        Ok(serde_json::from_str(&text)?)
    }
}

/// Deserialize and check the count invariants; anything off is a parse error.
pub fn parse_envelope(body: Value) -> Result<ResponseEnvelope> {
    let envelope: ResponseEnvelope = serde_json::from_value(body)?;
    envelope.validate().map_err(FetchError::JsonParse)?;
    Ok(envelope)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// URL without its query string, so service keys never reach the logs.
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}
