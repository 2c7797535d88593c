pub mod types;
pub mod config;
pub mod registry;
pub mod mock_data;
pub mod fetcher;
pub mod orchestrator;
pub mod batch;
pub mod store;

pub use types::*;
pub use config::{AccessConfig, ExecutionMode};
pub use registry::{SourceDescriptor, SourceRegistry};
pub use fetcher::Fetcher;
pub use orchestrator::{AccessMode, Fetched, Orchestrator};
pub use batch::{fetch_parallel, fetch_sequential, fetch_single};
pub use store::SourceStore;
