// personalization/crates/personalization/src/main.rs

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use dotenvy::dotenv;
#[cfg(feature = "cli")]
use personalization::{config::Config, run_server};

/// Personalization service: event ingestion and study roadmaps
#[cfg(feature = "cli")]
#[derive(Debug, Parser)]
#[command(name = "personalization", version, about)]
struct Args {
    /// Bind host (overrides API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides API_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// JSON roadmap seed file (overrides ROADMAP_SEED_PATH)
    #[arg(long)]
    seed: Option<std::path::PathBuf>,
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let mut cfg = Config::from_env()?;
    if let Some(host) = args.host {
        cfg.api_host = host;
    }
    if let Some(port) = args.port {
        cfg.api_port = port;
    }
    if let Some(seed) = args.seed {
        cfg.roadmap_seed_path = Some(seed);
    }

    run_server(cfg).await
}

#[cfg(not(feature = "cli"))]
fn main() {
    println!("CLI feature not enabled. Enable with --features cli");
}
