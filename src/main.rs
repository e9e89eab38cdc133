//! `vwap`: subscribes to a trade feed and streams per-pair VWAP updates to
//! stderr, one line per update, until interrupted.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use vwap_engine::config::{Args, Config};
use vwap_engine::pipeline::Supervisor;
use vwap_engine::transport::Ingestor;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.devlogging);

    let config = match Config::resolve(args) {
        Ok(config) => config,
        Err(err) => {
            // Logging isn't guaranteed to be visible to every caller of
            // this binary (e.g. a misconfigured EnvFilter), so the fatal
            // startup error goes to both tracing and stderr directly.
            error!(error = %err, "invalid configuration");
            return Err(err.into());
        }
    };

    info!(
        workers = config.worker_pool_size,
        window = config.window_size,
        pairs = ?config.product_ids,
        url = %config.socket_url,
        "starting vwap engine"
    );

    let supervisor = Arc::new(Supervisor::start(&config));
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let shutdown_cancel_tx = cancel_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            let _ = shutdown_cancel_tx.send(true);
        }
    });

    let sink_supervisor = supervisor.clone();
    let sink_handle = tokio::spawn(async move {
        while let Some(result) = sink_supervisor.next_result().await {
            eprintln!("ProductID:{} VWAP:{}", result.pair, result.vwap);
        }
    });

    // Driven directly on the main task, mirroring the teacher's unspawned
    // `receiver.run().await?` shape; the ctrl-c task above and this future's
    // own cancellation watch race independently of the supervisor's shutdown.
    let ingestor = Ingestor::new(config.socket_url.clone(), config.product_ids.clone());
    ingestor.run(supervisor.clone(), cancel_rx).await?;

    // The ingestor has stopped (cancelled, or the feed is permanently gone);
    // either way, tear down the pipeline and let the sink drain C5 to
    // completion before returning.
    let _ = cancel_tx.send(true);
    supervisor.cancel().await;
    sink_handle.await?;

    info!("vwap engine stopped");
    Ok(())
}

fn init_logging(devlogging: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    if devlogging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .pretty()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).compact().init();
    }
}
