mod bootstrap;

use std::time::Duration;

use anyhow::Result;
use monitor_core::auth::AuthenticationService;
use monitor_core::notifications::{ConsoleListener, TracingListener};
use monitor_core::settings::Settings;
use monitor_core::watch_list::WatchList;
use monitor_data::fetcher::Fetcher;
use monitor_data::http::HttpFetcher;
use monitor_runtime::detector::ChangeDetector;
use monitor_runtime::monitor::SiteMonitor;
use monitor_runtime::orchestrator::{MonitoringOrchestrator, RoundReport};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Site Monitor v{} starting", env!("CARGO_PKG_VERSION"));

    let watch_list_path = settings.watch_list_path();
    let watch_list = WatchList::load_or_init(&watch_list_path)?;
    tracing::info!(
        "Watch list: {}",
        bootstrap::describe_watch_list(&watch_list_path, &watch_list)
    );

    let fetcher: Box<dyn Fetcher> = if settings.offline {
        tracing::info!("Offline mode: serving scripted pages");
        Box::new(bootstrap::offline_fetcher(&watch_list))
    } else {
        Box::new(HttpFetcher::new(Duration::from_secs(settings.timeout)))
    };

    let users = watch_list.into_users(&AuthenticationService::new())?;

    let mut detector = ChangeDetector::new(fetcher);
    detector.bus_mut().register(Box::new(ConsoleListener));
    detector.bus_mut().register(Box::new(TracingListener));

    let orchestrator = MonitoringOrchestrator::new(
        SiteMonitor::new(detector, users),
        Duration::from_secs(settings.interval),
        settings.rounds,
    );
    let (mut rx, handle) = orchestrator.start();

    tokio::select! {
        _ = async {
            while let Some(report) = rx.recv().await {
                log_report(&report);
            }
        } => {
            tracing::info!("Monitoring finished");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down monitoring task");
            handle.abort();
        }
    }

    Ok(())
}

fn log_report(report: &RoundReport) {
    let s = &report.summary;
    tracing::info!(
        round = report.round,
        checked = s.checked,
        seeded = s.seeded,
        unchanged = s.unchanged,
        changed = s.changed,
        fetch_failed = s.fetch_failed,
        strategy_errors = s.strategy_errors,
        failed_deliveries = s.failed_deliveries,
        "Check #{} complete",
        report.round
    );
}
