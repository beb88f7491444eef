use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spiral::cli::{App, Cli};
use spiral::config::SpiralConfig;
use spiral::paths;
use spiral_core::{ContextStore, FsStorage, RoadmapStore};

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "spiral=warn,spiral_core=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = SpiralConfig::load();
    let cwd = std::env::current_dir()?;
    let roadmap_path = paths::resolve_roadmap_path(cli.file, &config, &cwd);
    let state_dir = paths::state_dir(&roadmap_path, &config);
    tracing::debug!("Using roadmap {} (state in {})", roadmap_path.display(), state_dir.display());

    let storage = Arc::new(FsStorage);
    let app = App {
        roadmap: RoadmapStore::new(storage.clone(), roadmap_path),
        context: ContextStore::new(storage, state_dir),
        config,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.run(cli.command, &mut out)
}
