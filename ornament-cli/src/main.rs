mod cli;
mod commands;
mod config_file;

use clap::Parser;

use cli::{Cli, Command};
use commands::simulate_cmd::SimulateOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = config_file::resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Simulate {
            frames,
            fps,
            seed,
            realtime,
        } => {
            let options = SimulateOptions {
                frames,
                fps,
                seed,
                realtime,
            };
            commands::simulate_cmd::run(options, config).await
        }
        Command::Countdown { month, day, once } => commands::countdown_cmd::run(month, day, once, config).await,
    }
}
