//! Command line for pointswarm-runner

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pointswarm-runner")]
#[command(about = "Run a point swarm simulation headless", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON config file (built-in twin-emitter setup if omitted)
    pub config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    pub ticks: u64,

    /// Simulate flat (2) or in a box (3)
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=3))]
    pub dims: u8,

    /// RNG seed, overrides the config
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Drive intensity with a sine of this period in ticks
    #[arg(long, conflicts_with = "signal")]
    pub pulse: Option<f32>,

    /// Drive intensity from a file of factors, one per line, cycled
    #[arg(long)]
    pub signal: Option<PathBuf>,

    /// Write the final frame as JSON to this file
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Write the effective config as JSON to this file and exit
    #[arg(long)]
    pub write_config: Option<PathBuf>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter picked by `-v`/`-q`; `RUST_LOG` still wins.
    pub fn log_level(&self) -> &'static str {
        match (self.verbose, self.quiet) {
            (0, true) => "error",
            (0, false) => "warn",
            (1, _) => "info",
            (2, _) => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pointswarm-runner").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_log_level_ladder() {
        assert_eq!(parse(&[]).log_level(), "warn");
        assert_eq!(parse(&["-q"]).log_level(), "error");
        assert_eq!(parse(&["-v"]).log_level(), "info");
        assert_eq!(parse(&["-vv"]).log_level(), "debug");
        assert_eq!(parse(&["-vvv"]).log_level(), "trace");
        assert_eq!(parse(&["-v", "-q"]).log_level(), "info");
    }

    #[test]
    fn test_dims_range() {
        assert_eq!(parse(&["--dims", "3"]).dims, 3);
        assert!(Cli::try_parse_from(["pointswarm-runner", "--dims", "4"]).is_err());
    }
}
