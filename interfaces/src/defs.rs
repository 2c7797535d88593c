use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One field of a facility record. The portal only ever sends strings and
/// numbers, with the occasional `null` for a blank column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
    Empty,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.into())
    }
}

/// A single facility row, keyed by the portal's (Korean) column names.
pub type Record = BTreeMap<String, FieldValue>;

/// Paginated response shape shared by every source, real or mock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
    pub current_count: u64,
    pub match_count: u64,
    #[serde(rename = "data")]
    pub items: Vec<Record>,
    #[serde(rename = "_notice", default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ResponseEnvelope {
    /// Build a first-page envelope around `items`, counts derived from the list.
    pub fn from_items(items: Vec<Record>) -> Self {
        let count = items.len() as u64;
        Self {
            page: 1,
            per_page: 10,
            total_count: count,
            current_count: count,
            match_count: count,
            items,
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Check the count invariants the rest of the pipeline relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.current_count != self.items.len() as u64 {
            return Err(format!(
                "currentCount {} does not match {} items",
                self.current_count,
                self.items.len()
            ));
        }
        if self.total_count < self.current_count {
            return Err(format!(
                "totalCount {} is smaller than currentCount {}",
                self.total_count, self.current_count
            ));
        }
        Ok(())
    }
}

/// Query options forwarded to a source. Unset page values fall back to
/// `page=1, perPage=10`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub search_type: Option<String>,
    pub sort: Option<String>,
    pub sort_order: Option<String>,
}

impl QueryOptions {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PER_PAGE: u32 = 10;

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Query-string pairs in wire naming, defaults merged in and blank
    /// filters dropped.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.unwrap_or(Self::DEFAULT_PAGE).to_string()),
            ("perPage", self.per_page.unwrap_or(Self::DEFAULT_PER_PAGE).to_string()),
        ];
        let extras = [
            ("search", &self.search),
            ("searchType", &self.search_type),
            ("sort", &self.sort),
            ("sortOrder", &self.sort_order),
        ];
        for (key, value) in extras {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                pairs.push((key, value.to_owned()));
            }
        }
        pairs
    }
}

/// One entry of a batch call.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRequest {
    pub source_id: String,
    pub options: QueryOptions,
}

impl SourceRequest {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            options: QueryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// Category of a failed fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    UnknownSource,
    Network,
    HttpStatus(u16),
    JsonParse,
    UpstreamApi,
}

/// Why a result carries canned data instead of a live response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MockReason {
    /// No usable credential and no proxy: mock data by policy.
    NoCredential,
    /// A live call was attempted and failed.
    Fallback(FailureKind),
}

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    Proxy,
    Direct,
    Mock(MockReason),
}

impl DataOrigin {
    pub fn is_live(&self) -> bool {
        matches!(self, DataOrigin::Proxy | DataOrigin::Direct)
    }

    /// The failure that forced a mock fallback, if any.
    pub fn fallback_kind(&self) -> Option<FailureKind> {
        match self {
            DataOrigin::Mock(MockReason::Fallback(kind)) => Some(*kind),
            _ => None,
        }
    }
}

/// Outcome of one fetch attempt for one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    pub source_id: String,
    pub payload: Option<ResponseEnvelope>,
    pub succeeded: bool,
    pub error_message: Option<String>,
    pub origin: Option<DataOrigin>,
}

impl FetchResult {
    pub fn success(source_id: impl Into<String>, payload: ResponseEnvelope, origin: DataOrigin) -> Self {
        Self {
            source_id: source_id.into(),
            payload: Some(payload),
            succeeded: true,
            error_message: None,
            origin: Some(origin),
        }
    }

    /// A mock payload standing in for a failed live call. The raw failure is
    /// kept in `error_message`; the envelope carries the user-facing notice.
    pub fn fallback(
        source_id: impl Into<String>,
        payload: ResponseEnvelope,
        kind: FailureKind,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            payload: Some(payload),
            succeeded: true,
            error_message: Some(error_message.into()),
            origin: Some(DataOrigin::Mock(MockReason::Fallback(kind))),
        }
    }

    pub fn failure(source_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            payload: None,
            succeeded: false,
            error_message: Some(error_message.into()),
            origin: None,
        }
    }
}
