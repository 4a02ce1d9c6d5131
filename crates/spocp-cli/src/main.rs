// SPDX-License-Identifier: MIT OR Apache-2.0

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use parking_lot::RwLock;

use spocp_engine::DecisionEngine;

/// A generalized authorization decision service over restricted
/// S-expressions.
#[derive(Debug, Parser)]
#[command(name = "spocpd", version, about)]
struct Cli {
    /// Directory of rule files to load at startup (and on reload).
    #[arg(long)]
    rules_dir: PathBuf,

    /// Enable the TCP frontend on this address (e.g. 127.0.0.1:4751).
    #[arg(long)]
    tcp_bind: Option<String>,

    /// Enable the HTTP frontend on this address (e.g. 127.0.0.1:8080).
    #[arg(long)]
    http_bind: Option<String>,

    /// Re-walk the rules directory every N seconds and atomically swap
    /// the engine's store. Omit to disable periodic reload.
    #[arg(long)]
    reload_interval_secs: Option<u64>,

    /// Write the process ID to this file on startup.
    #[arg(long)]
    pid_file: Option<PathBuf>,

    /// TLS certificate path. Accepted and validated for presence only —
    /// this binary does not terminate TLS itself.
    #[arg(long)]
    tls_cert: Option<PathBuf>,

    /// TLS private key path, paired with `--tls-cert`.
    #[arg(long)]
    tls_key: Option<PathBuf>,

    /// Log verbosity: error, warn, info, debug, or trace.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    builder.init();
}

fn write_pid_file(path: &PathBuf) -> Result<()> {
    std::fs::write(path, std::process::id().to_string())
        .with_context(|| format!("failed to write PID file at {}", path.display()))
}

fn validate_tls_paths(cli: &Cli) -> Result<()> {
    match (&cli.tls_cert, &cli.tls_key) {
        (Some(cert), Some(key)) => {
            if !cert.is_file() {
                bail!("TLS certificate not found at {}", cert.display());
            }
            if !key.is_file() {
                bail!("TLS key not found at {}", key.display());
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            bail!("--tls-cert and --tls-key must be given together");
        }
        (None, None) => {}
    }
    Ok(())
}

fn spawn_reload_timer(engine: Arc<RwLock<DecisionEngine>>, rules_dir: PathBuf, interval: Duration) {
    std::thread::spawn(move || loop {
        std::thread::sleep(interval);
        let mut fresh = DecisionEngine::new();
        match spocp_net::loader::load_dir(&rules_dir, &mut fresh) {
            Ok(report) => {
                log::info!(
                    "reload: {} rule(s) loaded from {} file(s), {} failure(s)",
                    report.rules_loaded,
                    report.files_scanned,
                    report.failures.len()
                );
                *engine.write() = fresh;
            }
            Err(error) => log::error!("reload failed: {error}"),
        }
    });
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    validate_tls_paths(&cli)?;

    if cli.tcp_bind.is_none() && cli.http_bind.is_none() {
        bail!("at least one of --tcp-bind or --http-bind must be given");
    }
    if !cli.rules_dir.is_dir() {
        bail!("rules directory {} does not exist", cli.rules_dir.display());
    }

    if let Some(pid_file) = &cli.pid_file {
        write_pid_file(pid_file)?;
    }

    let mut engine = DecisionEngine::new();
    let report = spocp_net::loader::load_dir(&cli.rules_dir, &mut engine)
        .with_context(|| format!("failed to load rules from {}", cli.rules_dir.display()))?;
    log::info!(
        "loaded {} rule(s) from {} file(s) in {}, {} failure(s)",
        report.rules_loaded,
        report.files_scanned,
        cli.rules_dir.display(),
        report.failures.len()
    );
    let engine = Arc::new(RwLock::new(engine));

    if let Some(secs) = cli.reload_interval_secs {
        spawn_reload_timer(Arc::clone(&engine), cli.rules_dir.clone(), Duration::from_secs(secs));
    }

    let mut handles = Vec::new();

    if let Some(bind) = &cli.tcp_bind {
        let listener = TcpListener::bind(bind).with_context(|| format!("failed to bind TCP on {bind}"))?;
        log::info!("TCP frontend listening on {bind}");
        let engine = Arc::clone(&engine);
        handles.push(std::thread::spawn(move || spocp_net::tcp::serve(listener, engine)));
    }

    if let Some(bind) = &cli.http_bind {
        let listener = TcpListener::bind(bind).with_context(|| format!("failed to bind HTTP on {bind}"))?;
        log::info!("HTTP frontend listening on {bind}");
        let engine = Arc::clone(&engine);
        handles.push(std::thread::spawn(move || spocp_net::http::serve(listener, engine)));
    }

    for handle in handles {
        let _ = handle.join();
    }

    Ok(())
}
