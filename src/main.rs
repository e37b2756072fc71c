use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planboard::{api, state::StateHandle, watcher};

#[derive(Parser)]
#[command(name = "planboard")]
#[command(about = "Live project-planning state server over a .planning directory")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the planboard server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "4317")]
        port: u16,

        /// Planning directory to serve (defaults to ./.planning)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "planboard=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let (port, path) = match cli.command {
        Some(Commands::Serve { port, path }) => (port, path),
        None => (4317, None),
    };

    let planning_root = match path {
        Some(path) => path,
        None => std::env::current_dir()
            .context("cannot determine current directory")?
            .join(".planning"),
    };
    anyhow::ensure!(
        planning_root.is_dir(),
        "planning directory not found: {}",
        planning_root.display()
    );

    serve(planning_root, port).await
}

async fn serve(planning_root: PathBuf, port: u16) -> anyhow::Result<()> {
    tracing::info!("Loading planning state from {}", planning_root.display());
    let handle = StateHandle::load(planning_root.clone()).await;

    let snapshot = handle.snapshot();
    tracing::info!(
        "Loaded {} phases, {} plans, {} milestones, {} requirements, {} search entries",
        snapshot.phases.len(),
        snapshot.plan_count(),
        snapshot.milestones.len(),
        snapshot.requirements.len(),
        snapshot.search_index.len(),
    );

    // The watcher handle must outlive the server or the stream stops.
    let (_watcher, mut batches) = watcher::watch_planning_dir(&planning_root)
        .context("failed to watch planning directory")?;

    let update_handle = handle.clone();
    tokio::spawn(async move {
        while let Some(batch) = batches.recv().await {
            tracing::debug!("applying {} file events", batch.len());
            update_handle.apply_events(&batch).await;
        }
    });

    let app = api::create_router(handle);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!("planboard server listening on http://127.0.0.1:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
