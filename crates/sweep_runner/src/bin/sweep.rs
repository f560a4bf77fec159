use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sweep_core::SweepConfig;
use sweep_runner::{logging, CommandRunner, CsvResultSink, PerformanceTracker, SweepDriver};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "sweep",
    about = "Run a benchmark command once per parameter combination",
    long_about = "Enumerates participants x bins x mailbox check intervals, repeats each\n\
                  combination, runs the given command for it and appends one CSV row\n\
                  per finished run."
)]
struct Cli {
    /// JSON sweep configuration; built-in defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV file results are appended to
    #[arg(long, default_value = "performance_evaluation.csv")]
    output: PathBuf,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "SWEEP_LOG_LEVEL", default_value = "info")]
    log_level: String,
    /// Prefix of generated run identifiers (defaults to the config fingerprint)
    #[arg(long)]
    run_prefix: Option<String>,
    /// Print the planned combinations without running anything
    #[arg(long)]
    dry_run: bool,
    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
    /// Benchmark command and its arguments, given after `--`
    #[arg(last = true)]
    command: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = match &cli.config {
        Some(path) => SweepConfig::load(path)?,
        None => SweepConfig::default(),
    };
    let total = config.total_runs()?;

    if cli.dry_run {
        for (sequence, combination) in config.build_enumerator()?.enumerate() {
            println!("{sequence:>6}  {combination}");
        }
        println!("{total} runs planned");
        return Ok(());
    }

    let Some((program, args)) = cli.command.split_first() else {
        return Err("no benchmark command given; pass it after `--`".into());
    };

    let fingerprint = config.fingerprint();
    let run_prefix = cli
        .run_prefix
        .clone()
        .unwrap_or_else(|| fingerprint[..12].to_string());

    let tracker = Arc::new(PerformanceTracker::new());
    let runner = CommandRunner::new(program.clone(), args.to_vec(), Arc::clone(&tracker))
        .with_run_prefix(run_prefix);
    let sink = CsvResultSink::open(&cli.output)?;
    info!(
        output = %cli.output.display(),
        %fingerprint,
        total,
        "prepared performance evaluation"
    );

    let mut driver =
        SweepDriver::from_config(&config, runner, tracker, sink)?.with_progress(!cli.no_progress);
    let summary = driver.run()?;

    if summary.failed > 0 {
        warn!(failed = summary.failed, "some runs failed and were not recorded");
    }
    println!(
        "Completed {} runs ({} failed), results in {}",
        summary.completed,
        summary.failed,
        driver.sink().path().display()
    );

    Ok(())
}
