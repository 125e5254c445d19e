use anyhow::Context;
use clap::Parser;
use receipt_core::config::load_env_files;
use receipt_core::Config;

// Use mimalloc as the global allocator for lower fragmentation in long-running containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "receipt-api", about = "Receipt ingestion API server")]
struct Cli {
    /// Load `.env.<profile>` on top of `.env`
    #[arg(long)]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let profile_file = load_env_files(cli.profile.as_deref())?;
    let config = Config::from_env().context("Failed to load configuration")?;

    let (state, router) = receipt_api::setup::initialize_app(config.clone()).await?;

    if let Some(file) = profile_file {
        tracing::info!(profile_file = %file, "Loaded environment profile");
    }

    receipt_api::setup::server::start_server(&config, router, state.shutdown.clone()).await?;

    Ok(())
}
