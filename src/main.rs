use anyhow::Result;
use portstats::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        engine = %app_config.engine.connection_info().describe(),
        ports = app_config.ports.len(),
        "starting portstats"
    );

    let hub = hub::StatsHub::from_config(&app_config).shared();
    let counters = Arc::new(hub::HubCounters::default());

    let (reader_shutdown_tx, reader_shutdown_rx) = tokio::sync::oneshot::channel();
    let reader_handle = match app_config.engine.snapshot_source.as_deref() {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|e| anyhow::anyhow!("snapshot source {}: {}", path, e))?;
            ingest::spawn_reader(file, hub.clone(), counters.clone(), reader_shutdown_rx)
        }
        None => ingest::spawn_reader(
            tokio::io::stdin(),
            hub.clone(),
            counters.clone(),
            reader_shutdown_rx,
        ),
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            hub: hub.clone(),
            counters: counters.clone(),
            shutdown_rx,
        },
        worker::WorkerConfig {
            stale_check_interval_ms: app_config.monitoring.stale_check_interval_ms,
            stale_after: app_config.stats.stale_after(),
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(hub, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = reader_shutdown_tx.send(());
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
            // stdin reads block in a helper thread; don't wait on the reader past shutdown.
            reader_handle.abort();
        }
    }

    Ok(())
}
