// Use the interfaces crate for the shared data model
pub use interfaces::defs::{
    DataOrigin, FailureKind, FetchResult, FieldValue, MockReason, QueryOptions, Record,
    ResponseEnvelope, SourceRequest,
};
pub use interfaces::state::{BatchStatus, SourcePhase, SourceState};

pub const NOTICE_NO_CREDENTIAL: &str = "API 키가 설정되지 않아 모의 데이터를 사용합니다.";
pub const NOTICE_NETWORK: &str = "API 요청 중 오류가 발생하여 모의 데이터를 사용합니다.";
pub const NOTICE_SERVER_ERROR: &str = "API 서버 오류로 인해 모의 데이터를 사용합니다.";
pub const NOTICE_PARSE_ERROR: &str = "API 응답 파싱 오류로 인해 모의 데이터를 사용합니다.";

/// What the batch layer does with a transient failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Substitute the source's canned data, annotated with the cause.
    #[default]
    Mock,
    /// Report the failure to the caller as-is.
    Surface,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    /// Simulated latency of mock responses.
    pub mock_latency_ms: u64,
    pub fallback: FallbackPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "PublicDataAggregator/1.0".to_string(),
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            follow_redirects: true,
            max_redirects: 5,
            mock_latency_ms: 1000,
            fallback: FallbackPolicy::Mock,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("지원하지 않는 API 타입입니다: {id}")]
    UnknownSource { id: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    #[error("Response parse error: {0}")]
    JsonParse(String),

    #[error("{0}")]
    UpstreamApi(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::HttpStatus { status: status.as_u16() },
            None => FetchError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::JsonParse(err.to_string())
    }
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::UnknownSource { .. } => FailureKind::UnknownSource,
            FetchError::Network(_) | FetchError::InvalidUrl(_) => FailureKind::Network,
            FetchError::HttpStatus { status } => FailureKind::HttpStatus(*status),
            FetchError::JsonParse(_) => FailureKind::JsonParse,
            FetchError::UpstreamApi(_) => FailureKind::UpstreamApi,
        }
    }

    /// Transient failures may be replaced by mock data; an unknown source is
    /// a caller bug and never is.
    pub fn is_transient(&self) -> bool {
        !matches!(self, FetchError::UnknownSource { .. })
    }

    /// User-facing notice attached to the mock data that replaces this failure.
    pub fn fallback_notice(&self) -> String {
        match self {
            FetchError::UnknownSource { id } => format!("지원하지 않는 API 타입입니다: {id}"),
            FetchError::Network(_) | FetchError::InvalidUrl(_) => NOTICE_NETWORK.to_string(),
            FetchError::HttpStatus { status } => format!("{NOTICE_SERVER_ERROR} (HTTP {status})"),
            FetchError::JsonParse(_) => NOTICE_PARSE_ERROR.to_string(),
            FetchError::UpstreamApi(message) if message.starts_with("API 오류") => message.clone(),
            FetchError::UpstreamApi(message) => format!("API 오류: {message}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
