use crate::config::SourceSpec;
use crate::error::Result;
use crate::github::DependentsClient;
use crate::page::PageParser;
use crate::sink::DependentsSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::info;
use url::Url;

/// Summary returned by a job that stopped cleanly.
#[derive(Debug)]
pub struct JobOutcome {
    pub repo: String,
    pub cycles: u64,
    pub rows_kept: u64,
}

/// Scrapes one source repository's dependents listing page by page.
pub struct ScrapeJob {
    spec: SourceSpec,
    client: Arc<DependentsClient>,
    sink: Arc<DependentsSink>,
    parser: PageParser,
    start_url: String,
    poll_interval: Duration,
    max_cycles: Option<u64>,
}

impl ScrapeJob {
    pub fn new(
        spec: SourceSpec,
        client: Arc<DependentsClient>,
        sink: Arc<DependentsSink>,
        poll_interval: Duration,
        max_cycles: Option<u64>,
    ) -> Result<Self> {
        let parser = PageParser::new()?;
        let start_url = spec.dependents_url();

        Ok(ScrapeJob {
            spec,
            client,
            sink,
            parser,
            start_url,
            poll_interval,
            max_cycles,
        })
    }

    /// Override the first URL to fetch, e.g. for an alternate GitHub host or
    /// to resume mid-listing.
    pub fn with_start_url(mut self, url: impl Into<String>) -> Self {
        self.start_url = url.into();
        self
    }

    /// Fetch, parse, filter, and persist pages until shutdown is signalled or
    /// the cycle bound is reached.
    ///
    /// When the listing has no "Next" link the job does not finish: it waits
    /// one poll interval and re-fetches the same URL to pick up new
    /// dependents. Without a cycle bound only the shutdown signal (or an
    /// error) stops it.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<JobOutcome> {
        let stem = self.spec.output_stem();
        let mut current = self.start_url.clone();
        let mut cycles: u64 = 0;
        let mut rows_kept: u64 = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }

            info!(repo = %self.spec.repo, url = %current, rows_kept, "fetching dependents page");

            let body = self.client.fetch_page(&current).await?;
            let page = self.parser.parse(&body);

            for row in page.rows.iter().filter(|r| r.stars > self.spec.min_stars) {
                self.sink.append(&stem, row)?;
                rows_kept += 1;
            }

            cycles += 1;
            if let Some(max) = self.max_cycles {
                if cycles >= max {
                    break;
                }
            }

            match page.next_url {
                Some(href) => current = resolve_next_url(&current, &href)?,
                None => {
                    info!(
                        repo = %self.spec.repo,
                        "dependents list exhausted, waiting {} seconds before re-polling",
                        self.poll_interval.as_secs()
                    );
                    tokio::select! {
                        _ = sleep(self.poll_interval) => {}
                        changed = shutdown.changed() => {
                            // A dropped sender means the host is gone; stop too.
                            if changed.is_err() || *shutdown.borrow() {
                                break;
                            }
                        }
                    }
                }
            }
        }

        info!(repo = %self.spec.repo, cycles, rows_kept, "scrape job stopping");

        Ok(JobOutcome {
            repo: self.spec.repo.clone(),
            cycles,
            rows_kept,
        })
    }
}

/// The "Next" href may be relative; resolve it against the page it came from.
fn resolve_next_url(current: &str, href: &str) -> Result<String> {
    let base = Url::parse(current)?;
    Ok(base.join(href)?.to_string())
}
