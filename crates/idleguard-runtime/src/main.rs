//! idleguard: inactivity warning and auto-logout runtime binary.
//! Drives the core session controller from a JSON-lines feed on stdin.

use clap::Parser;
use serde::Serialize;

use idleguard_core::class_status::{LiveClass, LiveClassStatus};

mod auth;
mod cli;
mod config;
mod events;
mod host;
mod navigation;
mod watch;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("IDLEGUARD_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        cli::Command::Watch(opts) => {
            let session_config = config::load_config(args.config.as_deref())?;
            let policy = config::into_policy(config::apply_overrides(session_config, &opts))?;
            let session_file = opts
                .session_file
                .clone()
                .unwrap_or_else(cli::default_session_file);
            let summary = watch::run_session(
                policy,
                auth::FileSessionStore::new(session_file),
                &opts.path,
                host::HostClock::start(),
                tokio::io::BufReader::new(tokio::io::stdin()),
                &mut tokio::io::stdout(),
                &mut tokio::io::stderr(),
                shutdown_signal(),
            )
            .await?;
            tracing::debug!(?summary, "session ended");
        }
        cli::Command::CheckConfig => {
            let policy = config::into_policy(config::load_config(args.config.as_deref())?)?;
            println!("{}", serde_json::to_string_pretty(&policy)?);
        }
        cli::Command::ClassStatus(opts) => {
            println!("{}", serde_json::to_string_pretty(&class_status(&opts)?)?);
        }
    }

    Ok(())
}

/// Resolves on ctrl-c or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("ctrl-c handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {e}");
                ctrl_c.await;
                tracing::info!("received ctrl-c, shutting down");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await;
        tracing::info!("received ctrl-c, shutting down");
    }
}

#[derive(Debug, Serialize)]
struct ClassStatusReport {
    id: String,
    title: String,
    status: LiveClassStatus,
    join_link: Option<String>,
}

fn class_status(opts: &cli::ClassStatusOpts) -> anyhow::Result<ClassStatusReport> {
    let mut class = LiveClass::new(&opts.id, &opts.title, opts.starts_at, opts.ends_at)?;
    if let Some(link) = &opts.meeting_link {
        class = class.with_meeting_link(link);
    }
    let at = opts.at.unwrap_or_else(chrono::Utc::now);
    Ok(ClassStatusReport {
        status: class.status_at(at),
        join_link: class.join_link(at).map(str::to_string),
        id: class.id,
        title: class.title,
    })
}
