//! `run` command implementation - assemble and drive the router.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use config_loader::ConfigLoader;
use modules::{EchoModule, TimerModule};
use observability::PathSnapshot;
use router::{Router, RouterOptions};

use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_router(args: &RunArgs) -> Result<()> {
    // Metrics endpoint (optional); tracing is already initialized in main
    if args.metrics_port > 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let config = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let mut router = Router::with_options(RouterOptions {
        sink_timeout: match args.sink_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        },
    });

    // Built-in modules; real transports register here as they land.
    let timer = Arc::new(TimerModule::new());
    router.set_module(timer.clone());
    router.set_module(Arc::new(EchoModule::new()));

    router.set_config(&config).await;

    if router.paths().is_empty() {
        warn!("no paths registered, router will idle");
    }
    info!(
        modules = router.modules().len(),
        paths = router.paths().len(),
        "router configured"
    );

    let router = Arc::new(router);

    if args.stats_interval > 0 {
        spawn_stats_reporter(Arc::clone(&router), Duration::from_secs(args.stats_interval));
    }

    tokio::select! {
        result = router.run() => {
            result.context("router run failed")?;
            info!("all module run loops completed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            timer.stop();
        }
    }

    report_stats(&router);
    Ok(())
}

/// Periodically log and export per-path dispatch stats
fn spawn_stats_reporter(router: Arc<Router>, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // immediate first tick carries no data
        loop {
            ticker.tick().await;
            report_stats(&router);
        }
    });
}

fn report_stats(router: &Router) {
    for (path, snapshot) in router.metrics() {
        info!(
            path = %path,
            dispatched = snapshot.dispatched,
            delivered = snapshot.delivered,
            failed = snapshot.failed,
            timed_out = snapshot.timed_out,
            "path stats"
        );
        observability::record_path_snapshot(
            &path,
            &PathSnapshot {
                dispatched: snapshot.dispatched,
                delivered: snapshot.delivered,
                failed: snapshot.failed,
                timed_out: snapshot.timed_out,
            },
        );
    }
}
