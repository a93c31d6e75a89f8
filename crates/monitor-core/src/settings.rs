use clap::Parser;
use std::path::PathBuf;

use crate::watch_list::WatchList;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Watch web pages and get notified when they change
#[derive(Parser, Debug, Clone)]
#[command(
    name = "site-monitor",
    about = "Watch web pages and get notified when they change",
    version
)]
pub struct Settings {
    /// Watch-list JSON file (defaults to ~/.site-monitor/watch_list.json)
    #[arg(long, env = "SITE_MONITOR_WATCH_LIST")]
    pub watch_list: Option<PathBuf>,

    /// Seconds to wait between polling rounds (1-3600)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub interval: u64,

    /// Number of polling rounds to run (0 = until interrupted)
    #[arg(long, default_value = "10")]
    pub rounds: u32,

    /// HTTP request timeout in seconds (1-300)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: u64,

    /// Serve scripted in-memory pages instead of fetching over HTTP
    #[arg(long)]
    pub offline: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`load`](Self::load) but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::resolve(Settings::parse_from(args))
    }

    /// Apply the `--debug` flag.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The watch-list path to use: the explicit one, or the default location.
    pub fn watch_list_path(&self) -> PathBuf {
        self.watch_list
            .clone()
            .unwrap_or_else(WatchList::default_path)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["site-monitor"]);

        assert_eq!(settings.interval, 5);
        assert_eq!(settings.rounds, 10);
        assert_eq!(settings.timeout, 10);
        assert!(!settings.offline);
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_explicit_values() {
        let settings = Settings::parse_from([
            "site-monitor",
            "--watch-list",
            "/tmp/watch.json",
            "--interval",
            "30",
            "--rounds",
            "0",
            "--timeout",
            "3",
            "--offline",
        ]);
        assert_eq!(settings.watch_list, Some(PathBuf::from("/tmp/watch.json")));
        assert_eq!(settings.interval, 30);
        assert_eq!(settings.rounds, 0);
        assert_eq!(settings.timeout, 3);
        assert!(settings.offline);
    }

    #[test]
    fn test_settings_rejects_zero_interval() {
        let result = Settings::try_parse_from(["site-monitor", "--interval", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_rejects_unknown_log_level() {
        let result = Settings::try_parse_from(["site-monitor", "--log-level", "TRACE"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_log_file() {
        let settings = Settings::parse_from(["site-monitor", "--log-file", "/tmp/monitor.log"]);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/monitor.log")));
    }

    #[test]
    fn test_load_from_args_debug_overrides_log_level() {
        let settings = Settings::load_from_args(vec![
            "site-monitor".into(),
            "--log-level".into(),
            "ERROR".into(),
            "--debug".into(),
        ]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_watch_list_path_prefers_explicit() {
        let settings = Settings::parse_from(["site-monitor", "--watch-list", "/srv/w.json"]);
        assert_eq!(settings.watch_list_path(), PathBuf::from("/srv/w.json"));
    }

    #[test]
    fn test_watch_list_path_falls_back_to_default() {
        let mut settings = Settings::parse_from(["site-monitor"]);
        settings.watch_list = None;
        assert_eq!(settings.watch_list_path(), WatchList::default_path());
    }
}
