//! Blockgraph CLI binary.

use anyhow::Result;
use blockgraph::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the blockgraph CLI.
///
/// Uses tokio's `current_thread` runtime: the CLI does a single file load
/// followed by in-memory work.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=blockgraph=debug
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blockgraph=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting blockgraph CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Blockgraph CLI completed successfully");
    Ok(())
}
