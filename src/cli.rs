use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "github-dependents-scraper")]
#[command(about = "GitHub Dependents Scraper - Collects dependent repositories above a star threshold")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Path to the scrape jobs configuration file (JSON)
    #[arg(long, env = "SCRAPER_CONFIG", default_value = "jobs.json")]
    pub config: PathBuf,

    /// Directory for per-source output files (overrides config)
    #[arg(long, env = "SCRAPER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Seconds to wait after a dependents list is exhausted before re-polling (overrides config)
    #[arg(long, env = "SCRAPER_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Stop each job after this many fetch cycles (overrides config)
    #[arg(long, env = "SCRAPER_MAX_CYCLES")]
    pub max_cycles: Option<u64>,

    /// Stop all jobs as soon as any job fails
    #[arg(long)]
    pub fail_fast: bool,
}
