use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use monitor_core::watch_list::WatchList;
use monitor_data::scripted::ScriptedFetcher;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.site-monitor/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.site-monitor/`
/// - `~/.site-monitor/logs/`
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let monitor_dir = home.join(".site-monitor");
    std::fs::create_dir_all(&monitor_dir)?;
    std::fs::create_dir_all(monitor_dir.join("logs"))?;
    Ok(monitor_dir)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name to a `tracing` filter directive.
///
/// Unrecognised names pass through unchanged so that full `EnvFilter`
/// directives such as `monitor_runtime=debug` still work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Records go to stderr, or are appended without colours to `log_file` when
/// one is given. Falls back to `"info"` if the level cannot be parsed.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => (
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Offline content ────────────────────────────────────────────────────────────

/// Page versions replayed for every watched URL in `--offline` mode.
///
/// Round by round: seed, no change, markup-only change, equal-length text
/// change, outage, longer text change. Each strategy reacts differently to
/// the sequence.
const OFFLINE_PAGES: &[Option<&str>] = &[
    Some("<html><body><p>Edition 1</p></body></html>"),
    Some("<html><body><p>Edition 1</p></body></html>"),
    Some("<html><body><h1>Edition 1</h1></body></html>"),
    Some("<html><body><h1>Edition 2</h1></body></html>"),
    None,
    Some("<html><body><h1>Edition 2, revised</h1></body></html>"),
];

/// Build a fetcher that serves [`OFFLINE_PAGES`] for every URL in `watch_list`.
pub fn offline_fetcher(watch_list: &WatchList) -> ScriptedFetcher {
    let mut urls: Vec<&str> = watch_list
        .users
        .iter()
        .flat_map(|u| u.subscriptions.iter().map(|s| s.url.as_str()))
        .collect();
    urls.sort_unstable();
    urls.dedup();

    urls.into_iter().fold(ScriptedFetcher::new(), |fetcher, url| {
        OFFLINE_PAGES.iter().fold(fetcher, |f, page| match page {
            Some(content) => f.respond(url, *content),
            None => f.fail(url, "simulated outage"),
        })
    })
}

/// Human-readable location of the watch list for the startup log.
pub fn describe_watch_list(path: &Path, list: &WatchList) -> String {
    format!(
        "{} ({} users, {} subscriptions)",
        path.display(),
        list.users.len(),
        list.subscription_count()
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
