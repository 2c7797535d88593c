use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use public_data_aggregator::{
    AccessConfig, ExecutionMode, FallbackPolicy, FetchConfig, Orchestrator, QueryOptions,
    SourceRequest, SourceStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "public-data", about = "Browse municipal public-facility data")]
struct Cli {
    /// Execution mode; production always goes through the proxy
    #[arg(long, value_enum, global = true)]
    mode: Option<ModeArg>,

    /// Route requests through the proxy scripts
    #[arg(long, global = true)]
    use_proxy: bool,

    /// odcloud service key for direct mode
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Origin serving the proxy scripts, e.g. http://localhost:5173
    #[arg(long, global = true)]
    proxy_origin: Option<String>,

    /// Path prefix of the proxy scripts
    #[arg(long, global = true)]
    base_path: Option<String>,

    /// Root of the third-party API
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Simulated latency of mock responses
    #[arg(long, global = true)]
    mock_latency_ms: Option<u64>,

    /// Report failures instead of falling back to mock data
    #[arg(long, global = true)]
    surface_errors: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered sources
    List,
    /// Fetch one or more sources and print what the store holds
    Fetch(FetchArgs),
}

#[derive(clap::Args)]
struct FetchArgs {
    /// Source ids (PARKING, LIBRARY, PARK, CULTURE)
    sources: Vec<String>,

    /// Fetch every registered source
    #[arg(long)]
    all: bool,

    #[arg(long, value_enum, default_value_t = Strategy::Parallel)]
    strategy: Strategy,

    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    per_page: Option<u32>,

    #[arg(long)]
    search: Option<String>,

    #[arg(long)]
    search_type: Option<String>,

    #[arg(long)]
    sort: Option<String>,

    #[arg(long)]
    sort_order: Option<String>,

    /// Print the store state as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Development,
    Production,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Single,
    Parallel,
    Sequential,
}

impl Cli {
    fn access_config(&self) -> AccessConfig {
        let mut access = AccessConfig::from_env();
        if let Some(mode) = self.mode {
            access = access.with_mode(match mode {
                ModeArg::Development => ExecutionMode::Development,
                ModeArg::Production => ExecutionMode::Production,
            });
        }
        access.use_proxy |= self.use_proxy;
        if let Some(key) = &self.api_key {
            access.api_key = Some(key.clone());
        }
        if let Some(origin) = &self.proxy_origin {
            access.proxy_origin = origin.clone();
        }
        if let Some(base_path) = &self.base_path {
            access.base_path = base_path.clone();
        }
        if let Some(api_base_url) = &self.api_base_url {
            access.api_base_url = api_base_url.clone();
        }
        access
    }

    fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default();
        if let Some(latency) = self.mock_latency_ms {
            config.mock_latency_ms = latency;
        }
        if self.surface_errors {
            config.fallback = FallbackPolicy::Surface;
        }
        config
    }
}

impl FetchArgs {
    fn options(&self) -> QueryOptions {
        QueryOptions {
            page: self.page,
            per_page: self.per_page,
            search: self.search.clone(),
            search_type: self.search_type.clone(),
            sort: self.sort.clone(),
            sort_order: self.sort_order.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let access = cli.access_config();
    let orchestrator = Orchestrator::new(access, cli.fetch_config())
        .context("failed to build HTTP client")?;

    info!("Access mode: {:?}", orchestrator.select_mode());

    match &cli.command {
        Command::List => list_sources(&orchestrator),
        Command::Fetch(args) => fetch(SourceStore::new(orchestrator), args).await?,
    }

    Ok(())
}

fn list_sources(orchestrator: &Orchestrator) {
    for descriptor in orchestrator.registry().descriptors() {
        println!("{:<8} {}", descriptor.id, descriptor.display_name);
        println!("         proxy:  {}", descriptor.proxy_path);
        println!("         direct: {}", descriptor.direct_url);
    }
}

async fn fetch(store: SourceStore, args: &FetchArgs) -> anyhow::Result<()> {
    let source_ids: Vec<String> = if args.all {
        store
            .orchestrator()
            .registry()
            .list_source_ids()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        args.sources.iter().map(|s| s.to_uppercase()).collect()
    };

    if source_ids.is_empty() {
        bail!("no sources given; pass source ids or --all");
    }

    let options = args.options();
    let requests: Vec<SourceRequest> = source_ids
        .iter()
        .map(|id| SourceRequest::new(id.clone()).with_options(options.clone()))
        .collect();

    if !store.has_api_key() {
        info!("No API key configured; results will be mock data");
    }

    let results = match args.strategy {
        Strategy::Single => {
            if requests.len() != 1 {
                bail!("--strategy single takes exactly one source");
            }
            vec![store.load_single(&requests[0].source_id, &options).await?]
        }
        Strategy::Parallel => store.load_multiple(&requests).await,
        Strategy::Sequential => store.load_sequential(&requests).await,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&store.snapshot().await)?);
        return Ok(());
    }

    for result in &results {
        render(&store, &result.source_id).await;
    }

    let batch = store.batch_status().await;
    if let Some(error) = batch.error {
        eprintln!("batch error: {error}");
    }
    Ok(())
}

async fn render(store: &SourceStore, source_id: &str) {
    let name = store
        .orchestrator()
        .registry()
        .resolve(source_id)
        .map(|d| d.display_name.clone())
        .unwrap_or_else(|_| source_id.to_string());

    let Some(state) = store.get_source_state(source_id).await else {
        println!("== {name}: not loaded");
        return;
    };

    let updated = state
        .updated_at()
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    println!("== {} [{:?}] {}", name, state.phase(), updated);

    if let Some(error) = state.error_message() {
        println!("   error: {error}");
    }

    let Some(data) = state.data() else {
        return;
    };
    if let Some(notice) = &data.notice {
        println!("   notice: {notice}");
    }
    println!(
        "   page {} / perPage {} / {} of {} records",
        data.page, data.per_page, data.current_count, data.total_count
    );
    for item in &data.items {
        let line = item
            .iter()
            .take(4)
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("   - {line}");
    }
}
