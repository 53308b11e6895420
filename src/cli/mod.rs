use clap::Parser;
use log::LevelFilter;

use crate::coordinator::{DEFAULT_CONSUMERS, DEFAULT_SOURCE, RunConfig};
use crate::worker::{DEFAULT_ROUNDS, WaitStrategy};

#[derive(Parser, Debug)]
#[command(name = "shared_feed")]
#[command(version, about = "One producer filling a shared buffer while consumers watch it grow", long_about = None)]
pub struct Cli {
    /// Rounds the producer makes over the source items
    #[arg(short, long, default_value_t = DEFAULT_ROUNDS)]
    pub rounds: usize,

    /// Number of consumer threads
    #[arg(short, long, default_value_t = DEFAULT_CONSUMERS)]
    pub consumers: u32,

    /// How consumers wait for new items
    #[arg(short, long, value_enum, default_value_t = WaitStrategy::Block)]
    pub strategy: WaitStrategy,

    /// Source item; repeat to build the list
    #[arg(short, long = "item", value_name = "TEXT")]
    pub items: Vec<String>,

    /// Only print warnings and errors; the closing elapsed-time line is always printed
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Set verbose level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn config(&self) -> RunConfig<String> {
        let source = if self.items.is_empty() {
            DEFAULT_SOURCE.map(String::from).to_vec()
        } else {
            self.items.clone()
        };
        RunConfig {
            source,
            rounds: self.rounds,
            consumers: self.consumers,
            strategy: self.strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_reproduce_reference_run() {
        let cli = Cli::try_parse_from(["shared_feed"]).unwrap();
        let config = cli.config();
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.rounds, DEFAULT_ROUNDS);
        assert_eq!(config.consumers, 2);
        assert_eq!(config.strategy, WaitStrategy::Block);
        assert_eq!(cli.level(), LevelFilter::Info);
    }

    #[test]
    fn overrides() {
        let cli = Cli::try_parse_from([
            "shared_feed", "-r", "1", "-c", "3", "--strategy", "spin", "-i", "a", "-i", "b", "-vv",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.source, ["a", "b"]);
        assert_eq!(config.rounds, 1);
        assert_eq!(config.consumers, 3);
        assert_eq!(config.strategy, WaitStrategy::Spin);
        assert_eq!(cli.level(), LevelFilter::Trace);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["shared_feed", "-q", "-v"]).is_err());
        let cli = Cli::try_parse_from(["shared_feed", "--quiet"]).unwrap();
        assert_eq!(cli.level(), LevelFilter::Warn);
    }

    #[test]
    fn rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["shared_feed", "-s", "sleep"]).is_err());
    }
}
