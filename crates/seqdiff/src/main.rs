use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod config;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;
    init_logging(cli.verbose, config.log_level);
    commands::run_command(cli, &config)
}

fn init_logging(verbose: bool, configured: Level) {
    let level = if verbose { Level::DEBUG } else { configured };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
