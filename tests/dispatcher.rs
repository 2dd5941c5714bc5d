mod common;

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use common::{dependent_row, dependents_page};
use github_dependents_scraper::config::{Config, SourceSpec};
use github_dependents_scraper::dispatcher::run_jobs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::watch;

fn spec(repo: &str, min_stars: u32) -> SourceSpec {
    SourceSpec {
        repo: repo.to_string(),
        package_id: None,
        dependents_after: None,
        min_stars,
    }
}

fn config(jobs: Vec<SourceSpec>, base_url: String, output_dir: PathBuf) -> Config {
    Config {
        jobs,
        base_url,
        poll_interval_secs: 60,
        output_dir,
        fail_fast: false,
        max_cycles: None,
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn two_source_router() -> Router {
    let good_page = dependents_page(&[dependent_row("bigco", "app", "2,000")], None);
    Router::new()
        .route(
            "/acme/widget/network/dependents",
            get(move || {
                let page = good_page.clone();
                async move { Html(page) }
            }),
        )
        .route(
            "/acme/gadget/network/dependents",
            get(|| async { axum::http::StatusCode::NOT_FOUND }),
        )
}

#[tokio::test]
async fn test_jobs_run_concurrently_to_distinct_files() {
    let page_a = dependents_page(&[dependent_row("bigco", "app", "2,000")], None);
    let page_b = dependents_page(&[dependent_row("other", "tool", "800")], None);
    let app = Router::new()
        .route(
            "/acme/widget/network/dependents",
            get(move || {
                let page = page_a.clone();
                async move { Html(page) }
            }),
        )
        .route(
            "/acme/gadget/network/dependents",
            get(move || {
                let page = page_b.clone();
                async move { Html(page) }
            }),
        );
    let addr = serve(app).await;

    let dir = tempdir().unwrap();
    let mut config = config(
        vec![spec("acme/widget", 1000), spec("acme/gadget", 500)],
        format!("http://{addr}"),
        dir.path().to_path_buf(),
    );
    config.max_cycles = Some(1);

    let (shutdown_tx, _shutdown_rx) = watch::channel(false);
    let reports = run_jobs(&config, shutdown_tx)
        .await
        .expect("Dispatcher should finish");

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.result.is_ok()));

    let widget = std::fs::read_to_string(dir.path().join("acme-widget.txt")).unwrap();
    let gadget = std::fs::read_to_string(dir.path().join("acme-gadget.txt")).unwrap();
    assert_eq!(widget, "bigco/app, 2000\n");
    assert_eq!(gadget, "other/tool, 800\n");
}

#[tokio::test]
async fn test_one_job_failure_leaves_siblings_running() {
    let addr = serve(two_source_router()).await;

    let dir = tempdir().unwrap();
    let mut config = config(
        vec![spec("acme/widget", 1000), spec("acme/gadget", 1000)],
        format!("http://{addr}"),
        dir.path().to_path_buf(),
    );
    // The failing job errors on cycle one; the good job completes its bound.
    config.max_cycles = Some(1);

    let (shutdown_tx, _shutdown_rx) = watch::channel(false);
    let reports = run_jobs(&config, shutdown_tx)
        .await
        .expect("Dispatcher should finish despite the failed job");

    assert_eq!(reports.len(), 2);
    let widget = reports.iter().find(|r| r.repo == "acme/widget").unwrap();
    let gadget = reports.iter().find(|r| r.repo == "acme/gadget").unwrap();
    assert!(widget.result.is_ok());
    assert!(gadget.result.is_err());

    // The healthy job's output survived the sibling's failure.
    assert!(dir.path().join("acme-widget.txt").exists());
}

#[tokio::test]
async fn test_fail_fast_stops_sibling_jobs() {
    let addr = serve(two_source_router()).await;

    let dir = tempdir().unwrap();
    let mut config = config(
        vec![spec("acme/widget", 1000), spec("acme/gadget", 1000)],
        format!("http://{addr}"),
        dir.path().to_path_buf(),
    );
    // No cycle bound: the healthy job would poll forever, so only the
    // fail-fast signal from the failing sibling can end this run.
    config.fail_fast = true;

    let (shutdown_tx, _shutdown_rx) = watch::channel(false);
    let reports = tokio::time::timeout(
        Duration::from_secs(10),
        run_jobs(&config, shutdown_tx),
    )
    .await
    .expect("Fail-fast should stop the run promptly")
    .expect("Dispatcher should finish");

    assert_eq!(reports.len(), 2);
    assert_eq!(reports.iter().filter(|r| r.result.is_err()).count(), 1);
    assert_eq!(reports.iter().filter(|r| r.result.is_ok()).count(), 1);
}
