//! `vpipe`: drive video pipeline projects from the shell.

mod cli;
mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays usable by scripts. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    commands::run(cli).await
}
