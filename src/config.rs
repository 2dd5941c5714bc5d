use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const GITHUB_BASE_URL: &str = "https://github.com";

/// One scrape job: a source repository whose dependents listing gets crawled.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    /// Source repository in `owner/name` form.
    pub repo: String,

    /// Package discriminator for monorepos that publish several packages.
    #[serde(default)]
    pub package_id: Option<String>,

    /// Pagination cursor to resume the listing from.
    #[serde(default)]
    pub dependents_after: Option<String>,

    /// Keep dependents with strictly more stars than this.
    #[serde(default = "default_min_stars")]
    pub min_stars: u32,
}

impl SourceSpec {
    /// First URL to fetch for this source on github.com.
    pub fn dependents_url(&self) -> String {
        self.dependents_url_with_base(GITHUB_BASE_URL)
    }

    /// First URL to fetch against an alternate host, e.g. a GitHub Enterprise
    /// instance or a local test server.
    pub fn dependents_url_with_base(&self, base: &str) -> String {
        let mut url = format!("{}/{}/network/dependents", base, self.repo);
        if let Some(package_id) = &self.package_id {
            url.push_str("?package_id=");
            url.push_str(package_id);
        }
        if let Some(cursor) = &self.dependents_after {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str("dependents_after=");
            url.push_str(cursor);
        }
        url
    }

    /// File stem for this source's output file, path separators replaced.
    pub fn output_stem(&self) -> String {
        self.repo.replace('/', "-")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub jobs: Vec<SourceSpec>,

    /// GitHub host to scrape.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Seconds to wait after a dependents list is exhausted before re-polling.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Directory the per-source `.txt` files are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Stop all jobs as soon as any job fails.
    #[serde(default)]
    pub fail_fast: bool,

    /// Stop each job after this many fetch cycles. Unset means jobs poll
    /// indefinitely for new dependents.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty job lists, malformed repository names, and jobs whose
    /// sanitized names would collide on the same output file.
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            return Err(ScraperError::InvalidConfig(
                "no scrape jobs configured".to_string(),
            ));
        }

        let mut stems = HashSet::new();
        for spec in &self.jobs {
            match spec.repo.split_once('/') {
                Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {}
                _ => {
                    return Err(ScraperError::InvalidConfig(format!(
                        "repository `{}` is not in owner/name form",
                        spec.repo
                    )));
                }
            }
            if !stems.insert(spec.output_stem()) {
                return Err(ScraperError::InvalidConfig(format!(
                    "output file `{}.txt` is claimed by more than one job",
                    spec.output_stem()
                )));
            }
        }

        Ok(())
    }
}

fn default_min_stars() -> u32 {
    1000
}

fn default_base_url() -> String {
    GITHUB_BASE_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
