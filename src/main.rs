use anyhow::Context;
use clap::Parser;
use colored::*;
use github_dependents_scraper::cli::Cli;
use github_dependents_scraper::config::Config;
use github_dependents_scraper::dispatcher;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "GitHub Dependents Scraper".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    // CLI flags win over the config file
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(poll_interval) = cli.poll_interval {
        config.poll_interval_secs = poll_interval;
    }
    if let Some(max_cycles) = cli.max_cycles {
        config.max_cycles = Some(max_cycles);
    }
    if cli.fail_fast {
        config.fail_fast = true;
    }

    println!(
        "📋 Loaded {} scrape jobs from {}",
        config.jobs.len(),
        cli.config.display()
    );
    for spec in &config.jobs {
        println!(
            "  • {} (stars > {}) → {}.txt",
            spec.repo,
            spec.min_stars,
            spec.output_stem()
        );
    }
    println!("\nPress Ctrl+C to stop\n");

    let (shutdown_tx, _shutdown_rx) = watch::channel(false);
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n🛑 Shutting down, letting jobs finish their current cycle...");
            let _ = signal_tx.send(true);
        }
    });

    let reports = dispatcher::run_jobs(&config, shutdown_tx).await?;

    let mut failures = 0;
    for report in &reports {
        match &report.result {
            Ok(outcome) => {
                println!(
                    "✅ {}: kept {} dependents over {} cycles",
                    report.repo, outcome.rows_kept, outcome.cycles
                );
            }
            Err(e) => {
                failures += 1;
                println!("❌ {}: {}", report.repo, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} scrape jobs failed", reports.len());
    }

    Ok(())
}
