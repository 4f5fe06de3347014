//! Command-line front end for the todo list.

use clap::Parser;
use todo::cli::Cli;
use todo::config::Config;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().with_store_path(cli.store.clone());
    init_tracing(&config.log_filter);

    let output = todo::app::run(cli, &config).await?;
    println!("{output}");
    Ok(())
}

fn init_tracing(default_filter: &str) {
    // RUST_LOG wins over the configured default
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
