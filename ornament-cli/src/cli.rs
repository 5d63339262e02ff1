use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ornament",
    about = "Headless driver for the ornament countdown scene",
    version
)]
pub struct Cli {
    /// Scene configuration file (defaults to the nearest ornament.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the physics frame loop without a GPU
    Simulate {
        /// Stop after this many frames (runs until Ctrl-C when omitted)
        #[arg(long)]
        frames: Option<u64>,
        /// Simulated frames per second
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Placement seed (overrides `world.seed`)
        #[arg(long)]
        seed: Option<u64>,
        /// Pace frames against the wall clock
        #[arg(long)]
        realtime: bool,
    },
    /// Print the countdown to the configured date every second
    Countdown {
        /// Target month, 1-12 (overrides `countdown.month`)
        #[arg(long)]
        month: Option<u32>,
        /// Target day of month (overrides `countdown.day`)
        #[arg(long)]
        day: Option<u32>,
        /// Print once and exit
        #[arg(long)]
        once: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_defaults() {
        let cli = Cli::try_parse_from(["ornament", "simulate"]).unwrap();
        match cli.command {
            Command::Simulate { frames, fps, seed, realtime } => {
                assert_eq!(frames, None);
                assert_eq!(fps, 60.0);
                assert_eq!(seed, None);
                assert!(!realtime);
            }
            _ => panic!("expected simulate"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_countdown_with_global_config() {
        let cli = Cli::try_parse_from([
            "ornament", "countdown", "--month", "1", "--day", "1", "--once", "--config", "scene.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("scene.toml")));
        match cli.command {
            Command::Countdown { month, day, once } => {
                assert_eq!((month, day, once), (Some(1), Some(1), true));
            }
            _ => panic!("expected countdown"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["ornament"]).is_err());
    }
}
