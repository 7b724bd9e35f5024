use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workhours::{AppState, build_router, database, load_config, services::users};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    tracing::debug!("Loaded configuration:\n{}", config);

    let pool = database::connect(&config.database).await?;
    database::migrate(&pool).await?;

    {
        let mut conn = pool.acquire().await?;
        if users::ensure_bootstrap_admin(&mut conn, &config.bootstrap).await?.is_some() {
            tracing::warn!(
                username = %config.bootstrap.admin_username,
                "Created the initial admin account; change its password after the first login"
            );
        }
    }

    let address = config.server.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
