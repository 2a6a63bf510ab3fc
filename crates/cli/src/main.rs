use clap::Parser;
use dnsgate_domain::CliOverrides;
use dnsgate_jobs::{JobRunner, PendingQuerySweepJob};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dnsgate")]
#[command(version)]
#[command(about = "dnsgate - DNS forwarding proxy with domain blocking")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (ip:port)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Blocklist file loaded into the bloom filter at startup
    #[arg(long, value_name = "FILE")]
    blocklist: Option<String>,

    /// Control socket / pipe name
    #[arg(long)]
    socket_name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        bind_address: cli.bind,
        dns_port: cli.dns_port,
        upstream: cli.upstream,
        blocklist_path: cli.blocklist,
        socket_name: cli.socket_name,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting dnsgate v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = CancellationToken::new();

    let dns_services = di::DnsServices::new(&config).await?;
    let control_services = di::ControlServices::new(&dns_services);

    let mut tasks = server::start_dns_server(&config, &dns_services, shutdown.clone())?;
    tasks.push(server::start_control_server(
        &config.control,
        control_services.apply_command.clone(),
        shutdown.clone(),
    )?);

    let sweep = PendingQuerySweepJob::new(dns_services.evict_expired.clone())
        .with_interval(Duration::from_secs(config.upstream.sweep_interval_secs));
    tasks.extend(
        JobRunner::new()
            .with_pending_sweep(sweep)
            .with_shutdown_token(shutdown.clone())
            .start(),
    );

    wait_for_shutdown_signal().await;
    info!("Shutdown signal received, stopping");
    shutdown.cancel();

    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "Task ended abnormally");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl-C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
