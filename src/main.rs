use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use inbox_shield::{
    app::ScannerApp,
    cli::Cli,
    config,
    infrastructure::{directories, logging, shutdown},
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = config::load_config()?;
    cli.apply_overrides(&mut config)?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let shutdown = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = ScannerApp::initialize(config, shutdown)?;
    app.run(cli.command).await
}
