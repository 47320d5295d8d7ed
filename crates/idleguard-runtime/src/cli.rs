//! CLI definition using clap derive.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "idleguard", about = "Inactivity warning and auto-logout controller")]
pub struct Cli {
    /// TOML config file (default: $XDG_CONFIG_HOME/idleguard/config.toml)
    #[arg(long, short = 'c', global = true, env = "IDLEGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Guard a session, reading interaction events as JSON lines from stdin
    Watch(WatchOpts),
    /// Validate the configuration and print the effective policy (JSON)
    CheckConfig,
    /// Print a live class's status at a point in time (JSON)
    ClassStatus(ClassStatusOpts),
}

#[derive(clap::Args, Debug, Clone)]
pub struct WatchOpts {
    /// Initial route
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Session file; its existence is the signed-in session
    /// (default: $XDG_RUNTIME_DIR/idleguard/session)
    #[arg(long, env = "IDLEGUARD_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Override the configured inactivity timeout
    #[arg(long)]
    pub timeout_minutes: Option<u64>,

    /// Override the configured warning lead time
    #[arg(long)]
    pub warning_minutes: Option<u64>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ClassStatusOpts {
    /// Class identifier
    #[arg(long, default_value = "class")]
    pub id: String,

    /// Class title
    #[arg(long, default_value = "")]
    pub title: String,

    /// Scheduled start (RFC 3339)
    #[arg(long)]
    pub starts_at: DateTime<Utc>,

    /// Scheduled end (RFC 3339)
    #[arg(long)]
    pub ends_at: DateTime<Utc>,

    /// Meeting link, only shown while the class is ongoing
    #[arg(long)]
    pub meeting_link: Option<String>,

    /// Evaluate at this instant instead of now (RFC 3339)
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

/// Default session file using $USER for per-user isolation.
pub fn default_session_file() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(format!("{dir}/idleguard/session"));
    }
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    PathBuf::from(format!("/tmp/idleguard-{user}/session"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_defaults() {
        let cli = Cli::try_parse_from(["idleguard", "watch"]).expect("parse");
        let Command::Watch(opts) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(opts.path, "/");
        assert!(opts.timeout_minutes.is_none());
        assert!(opts.warning_minutes.is_none());
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "idleguard",
            "watch",
            "--path",
            "/classes",
            "--timeout-minutes",
            "30",
            "--config",
            "/etc/idleguard.toml",
        ])
        .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("/etc/idleguard.toml")));
        let Command::Watch(opts) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(opts.path, "/classes");
        assert_eq!(opts.timeout_minutes, Some(30));
    }

    #[test]
    fn class_status_parses_rfc3339() {
        let cli = Cli::try_parse_from([
            "idleguard",
            "class-status",
            "--starts-at",
            "2026-03-02T09:00:00Z",
            "--ends-at",
            "2026-03-02T10:00:00+00:00",
        ])
        .expect("parse");
        let Command::ClassStatus(opts) = cli.command else {
            panic!("expected class-status");
        };
        assert_eq!(opts.ends_at - opts.starts_at, chrono::TimeDelta::hours(1));
        assert!(opts.at.is_none());
    }

    #[test]
    fn class_status_rejects_bad_timestamp() {
        let result = Cli::try_parse_from([
            "idleguard",
            "class-status",
            "--starts-at",
            "tomorrow",
            "--ends-at",
            "2026-03-02T10:00:00Z",
        ]);
        assert!(result.is_err());
    }
}
