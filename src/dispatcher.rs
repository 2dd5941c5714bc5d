use crate::config::Config;
use crate::error::Result;
use crate::github::DependentsClient;
use crate::job::{JobOutcome, ScrapeJob};
use crate::sink::DependentsSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Terminal state of one scrape job.
pub struct JobReport {
    pub repo: String,
    pub result: Result<JobOutcome>,
}

/// Launch one scrape job per configured source and wait for all of them.
///
/// Job failures are isolated: a failed job is reported and its siblings keep
/// running, unless `fail_fast` is set, in which case the first failure
/// signals the remaining jobs to stop.
pub async fn run_jobs(config: &Config, shutdown: watch::Sender<bool>) -> Result<Vec<JobReport>> {
    let client = Arc::new(DependentsClient::new()?);
    let sink = Arc::new(DependentsSink::new(&config.output_dir)?);
    let poll_interval = Duration::from_secs(config.poll_interval_secs);

    let mut jobs = JoinSet::new();
    for spec in &config.jobs {
        let repo = spec.repo.clone();
        let start_url = spec.dependents_url_with_base(&config.base_url);
        let job = ScrapeJob::new(
            spec.clone(),
            Arc::clone(&client),
            Arc::clone(&sink),
            poll_interval,
            config.max_cycles,
        )?
        .with_start_url(start_url);
        let receiver = shutdown.subscribe();
        jobs.spawn(async move { (repo, job.run(receiver).await) });
    }

    info!("dispatched {} scrape jobs", config.jobs.len());

    let mut reports = Vec::with_capacity(config.jobs.len());
    while let Some(joined) = jobs.join_next().await {
        let (repo, result) = joined?;
        match &result {
            Ok(outcome) => {
                info!(
                    repo = %repo,
                    cycles = outcome.cycles,
                    rows_kept = outcome.rows_kept,
                    "scrape job finished"
                );
            }
            Err(e) => {
                error!(repo = %repo, "scrape job failed: {e}");
                if config.fail_fast {
                    warn!("fail-fast enabled, signalling remaining jobs to stop");
                    let _ = shutdown.send(true);
                }
            }
        }
        reports.push(JobReport { repo, result });
    }

    Ok(reports)
}
