//! Container resource usage reports for a finished experiment.
//!
//! Reads `stats-{node}.txt` for every container of the topology and writes
//! charts plus summaries into `{report_dir}/plots`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use fabnetgen::config_loader::{self, DEFAULT_TOPOLOGY_FILE};
use fabnetgen::stats::{self, report, ReportOptions, DEFAULT_MOVING_AVERAGE_WINDOW};

#[derive(Parser)]
#[command(name = "stats-report")]
#[command(about = "Resource usage charts and summaries for captured container stats")]
#[command(version)]
struct Cli {
    /// Directory holding the stats-{node}.txt captures
    report_dir: PathBuf,

    /// Path to the network topology YAML file
    #[arg(short, long, default_value = DEFAULT_TOPOLOGY_FILE)]
    config: PathBuf,

    /// CPU moving average window in samples
    #[arg(long, default_value_t = DEFAULT_MOVING_AVERAGE_WINDOW)]
    window: usize,

    /// Do not overlay the CPU moving average
    #[arg(long)]
    no_moving_average: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let topology = config_loader::load_topology(&cli.config)
        .with_context(|| format!("Failed to load topology '{}'", cli.config.display()))?;

    let nodes = stats::monitored_nodes(&topology);
    log::info!(
        "Loading stats for {} containers from {}...",
        nodes.len(),
        cli.report_dir.display()
    );
    let samples = stats::load_samples(&cli.report_dir, &nodes)?;

    let options = ReportOptions {
        moving_average_window: (!cli.no_moving_average).then_some(cli.window),
    };
    let resource_report = stats::generate_report(&cli.report_dir, samples, &options)?;

    report::print_summary(&resource_report);
    Ok(())
}
