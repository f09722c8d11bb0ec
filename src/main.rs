use std::{net::SocketAddr, time::Duration};

use dotenvy::dotenv;
use tracing::{info, warn};

use hanti_waitlist::infra::{
    InfraError,
    app::create_app,
    config::AppConfig,
    mail_outbox::run_mail_outbox_loop,
    setup::{AppBootstrap, init_app_state, init_tracing},
    shutdown::shutdown_signal,
};

/// How long queued welcome emails may take to flush after the server stops.
const OUTBOX_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(&config.log_file);

    let bind_addr = config.bind_addr;
    let AppBootstrap {
        app_state,
        pool,
        notifier,
        outbox_rx,
    } = init_app_state(config).await?;

    let outbox_worker = tokio::spawn(run_mail_outbox_loop(outbox_rx, notifier));

    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(InfraError::TcpBind)?;

    info!("Waitlist server listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(InfraError::Server)?;

    // The router and its outbox sender are gone; let queued emails finish.
    if tokio::time::timeout(OUTBOX_DRAIN_TIMEOUT, outbox_worker)
        .await
        .is_err()
    {
        warn!("Mail outbox did not drain before the timeout");
    }

    pool.close().await;
    info!("Database connection closed");

    Ok(())
}
