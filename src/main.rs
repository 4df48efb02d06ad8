//! PingSentry - host reachability monitor with multi-channel alerts.
//!
//! Probes one host on a fixed interval, debounces failures into a stable
//! UP/DOWN status, and fans confirmed transitions out to Telegram, webhook,
//! and WhatsApp channels.

mod alert;
mod config;
mod monitor;
mod probe;
mod web;

use alert::AlertDispatcher;
use config::{AlertConfig, MonitorConfig};
use monitor::MonitorLoop;
use probe::PingProber;
use web::HealthServer;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pingsentry", about = "Host reachability monitor with multi-channel alerts")]
struct Args {
    /// Host to monitor (overrides MONITOR_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Serve the liveness HTTP endpoint instead of running the monitor
    #[arg(long)]
    health_server: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut cfg = MonitorConfig::load();
    if let Some(host) = args.host {
        cfg.host = host;
    }
    let alert_cfg = AlertConfig::load();

    // Log to stdout and to a file; only a missing log destination is fatal.
    std::fs::create_dir_all(&cfg.log_dir)?;
    let file_appender = tracing_appender::rolling::never(&cfg.log_dir, "pingsentry.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(
            tracing_subscriber::EnvFilter::try_new(&cfg.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if args.health_server {
        let server = HealthServer::new(cfg.health_port, cfg.container_id);
        return server.start().await;
    }

    let dispatcher = AlertDispatcher::from_config(&alert_cfg);
    let channels = dispatcher.channel_names();
    tracing::info!(
        "Active alert channels: {}",
        if channels.is_empty() {
            "none".to_string()
        } else {
            channels.join(", ")
        }
    );
    tracing::info!("Container ID: {}", cfg.container_id);

    let monitor = MonitorLoop::new(cfg, Box::new(PingProber::new()), dispatcher);

    let (stop_tx, stop_rx) = tokio::sync::broadcast::channel(1);
    let monitor_task = tokio::spawn(monitor.run(stop_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping monitor...");

    let _ = stop_tx.send(());
    let _ = monitor_task.await;

    Ok(())
}
