use crate::types::{FetchError, Result};

/// Access parameters of one logical data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub id: String,
    pub proxy_path: String,
    pub direct_url: String,
    pub display_name: String,
}

/// (id, proxy script, odcloud endpoint, display name), in registration order.
/// Only the parking dataset has a published endpoint id so far.
const SOURCES: [(&str, &str, &str, &str); 4] = [
    (
        "PARKING",
        "parking-data.php",
        "15096534/v1/uddi:d91498fc-5229-4d2d-8e72-df412085242f",
        "주차장 데이터",
    ),
    ("LIBRARY", "library-data.php", "LIBRARY_ENDPOINT_ID", "도서관 데이터"),
    ("PARK", "park-data.php", "PARK_ENDPOINT_ID", "공원 데이터"),
    ("CULTURE", "culture-data.php", "CULTURE_ENDPOINT_ID", "문화시설 데이터"),
];

/// Fixed set of sources known to the application.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    descriptors: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    pub fn new(base_path: &str, api_base_url: &str) -> Self {
        let api_base_url = api_base_url.trim_end_matches('/');
        let descriptors = SOURCES
            .iter()
            .map(|(id, script, endpoint, name)| SourceDescriptor {
                id: id.to_string(),
                proxy_path: join_path(base_path, script),
                direct_url: format!("{api_base_url}/{endpoint}"),
                display_name: name.to_string(),
            })
            .collect();

        Self { descriptors }
    }

    pub fn resolve(&self, source_id: &str) -> Result<&SourceDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.id == source_id)
            .ok_or_else(|| FetchError::UnknownSource { id: source_id.to_string() })
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.descriptors.iter().any(|d| d.id == source_id)
    }

    pub fn list_source_ids(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn descriptors(&self) -> &[SourceDescriptor] {
        &self.descriptors
    }

    /// Position in registration order; unknown ids sort last.
    pub fn position(&self, source_id: &str) -> usize {
        self.descriptors
            .iter()
            .position(|d| d.id == source_id)
            .unwrap_or(usize::MAX)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new("/", crate::config::DEFAULT_API_BASE_URL)
    }
}

/// `{base}api/{script}` with duplicate slashes collapsed and a leading slash.
fn join_path(base_path: &str, script: &str) -> String {
    let raw = format!("/{base_path}/api/{script}");
    let mut path = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '/' && path.ends_with('/') {
            continue;
        }
        path.push(c);
    }
    path
}
