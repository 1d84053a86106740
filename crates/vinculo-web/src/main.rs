mod error;
mod latency;
mod routes;

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use clap::Parser;
use vinculo_core::config::VinculoConfig;
use vinculo_core::llm::LlmService;
use vinculo_core::store::ProjectStore;

use crate::error::ApiError;

#[derive(Parser)]
#[command(
    name = "vinculo-web",
    about = "Vinculo: community outreach project tracker",
    version
)]
struct Args {
    /// Address to bind (overrides web.host)
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (overrides web.port)
    #[arg(short, long)]
    port: Option<u16>,
    /// Directory holding .vinculo/config.toml (defaults to the current directory)
    #[arg(long)]
    project_dir: Option<PathBuf>,
    /// Start with no projects instead of the demo data
    #[arg(long)]
    empty: bool,
}

pub struct AppState {
    pub store: RwLock<ProjectStore>,
    pub config: VinculoConfig,
    pub llm: Option<LlmService>,
}

impl AppState {
    pub fn new(store: ProjectStore, config: VinculoConfig, llm: Option<LlmService>) -> Self {
        Self {
            store: RwLock::new(store),
            config,
            llm,
        }
    }

    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, ProjectStore>, ApiError> {
        self.store
            .read()
            .map_err(|e| ApiError::internal(format!("project store lock poisoned: {e}")))
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, ProjectStore>, ApiError> {
        self.store
            .write()
            .map_err(|e| ApiError::internal(format!("project store lock poisoned: {e}")))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("vinculo_web=info,vinculo_core=info")
                }),
        )
        .init();

    let args = Args::parse();

    let project_dir = match args.project_dir {
        Some(dir) => Some(dir),
        None => std::env::current_dir().ok(),
    };
    let config = VinculoConfig::load(project_dir.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("failed to load config, using defaults: {e}");
        VinculoConfig::default_config()
    });

    let store = if config.store.seed && !args.empty {
        ProjectStore::seeded()
    } else {
        ProjectStore::new()
    };
    tracing::info!(projects = store.len(), "project store ready");

    let llm = if config.llm.enabled {
        match LlmService::from_config(&config.llm) {
            Ok(service) => {
                tracing::info!(
                    provider = service.provider_name(),
                    model = service.model(),
                    "AI suggestions enabled"
                );
                Some(service)
            }
            Err(e) => {
                tracing::warn!("AI suggestions disabled: {e}");
                None
            }
        }
    } else {
        None
    };

    let host = args.host.unwrap_or_else(|| config.web.host.clone());
    let port = args.port.unwrap_or(config.web.port);

    let state = Arc::new(AppState::new(store, config, llm));

    let app = routes::router()
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive());

    let addr = format!("{host}:{port}");
    tracing::info!("vinculo-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
