use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cadence_hub::RecordOps;
use cadence_hub::middleware::session::cookie_key;
use cadence_hub::router::{CadenceState, cadence_router};
use cadence_hub::service::seed_loader;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &cadence_hub::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let admin_key = if cfg.admin_key.is_some() { "<set>" } else { "<none>" };
    let seed_path = cfg
        .seed_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<none>".to_string());
    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        admin_key,
        seed_path = %seed_path
    );

    let ops = RecordOps::connect(&cfg.database_url, cfg.db_max_connections).await?;

    if let Some(seed_path) = cfg.seed_path.as_ref() {
        match seed_loader::seed_from_path(&ops, seed_path).await {
            Ok(report) => info!(
                path = %seed_path.display(),
                directory = report.directory_inserted,
                resources = report.resources_inserted,
                skipped = report.skipped,
                "seed applied"
            ),
            Err(e) => warn!(path = %seed_path.display(), error = %e, "failed to apply seed"),
        }
    }

    let state = CadenceState::new(
        ops,
        cfg.admin_key.as_deref().map(Arc::from),
        cookie_key(cfg.cookie_secret.as_deref())?,
        cfg.insecure_cookie,
    );
    let app = cadence_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
