use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::info;
use shared_feed::cli::Cli;
use shared_feed::coordinator;

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.level())
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

/// Runs the coordinator and returns the duration it measured.
async fn run(cli: &Cli) -> Result<Duration> {
    let report = coordinator::run(cli.config())
        .await
        .context("producer/consumer run failed")?;
    info!(
        "{} items produced, {} observed by {} consumers",
        report.items.len(),
        report.consumers.iter().map(|c| c.observed).sum::<usize>(),
        report.consumers.len()
    );
    Ok(report.elapsed)
}

// Printed directly, not logged: these lines survive `--quiet` and `RUST_LOG`.
fn closing_lines(outcome: Result<Duration>, fallback: Duration) -> Vec<String> {
    match outcome {
        Ok(elapsed) => vec![format!("Time elapsed: {elapsed:?}")],
        Err(err) => vec![
            format!("Error: {err:#}"),
            format!("Time elapsed: {fallback:?}"),
        ],
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_logging(&cli);

    let start = Instant::now();
    let outcome = run(&cli).await;
    for line in closing_lines(outcome, start.elapsed()) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn success_reports_coordinator_duration() {
        let lines = closing_lines(Ok(Duration::from_millis(12)), Duration::from_secs(9));
        assert_eq!(lines, ["Time elapsed: 12ms"]);
    }

    #[test]
    fn failure_reports_error_chain_then_fallback_duration() {
        let failed: Result<Duration> = Err(anyhow!("producer task did not complete"));
        let lines = closing_lines(
            failed.context("producer/consumer run failed"),
            Duration::from_millis(3),
        );
        assert_eq!(
            lines,
            [
                "Error: producer/consumer run failed: producer task did not complete",
                "Time elapsed: 3ms",
            ]
        );
    }
}
