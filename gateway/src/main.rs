//! Aqman Gateway Entry Point

use anyhow::Context;
use aqman_gateway::cli::{Cli, Commands, ServeArgs};
use aqman_gateway::{bootstrap, logging, server};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let args = match cli.command {
        Some(Commands::Serve(args)) => args,
        None => ServeArgs::default(),
    };

    // 設定解決（非推奨警告を含む）より先に初期化する
    let _log_guard = logging::init(args.log_file().as_deref())?;

    info!("Aqman Gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = args.resolve();

    let ctx = bootstrap::initialize(&config)
        .await
        .context("failed to initialize gateway")?;

    let result = server::run(ctx.state, &config.bind_addr()).await;

    ctx.db_pool.close().await;
    result.with_context(|| format!("server error on {}", config.bind_addr()))
}
