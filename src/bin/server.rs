//! Shop server: loads settings from the environment (and `.env`), creates and migrates
//! the database, optionally seeds the catalog, then serves the API until Ctrl-C.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use wine_shop::{
    app, apply_migrations, connect, ensure_database_exists, seed_catalog, AppState, CatalogFixture, Settings,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wine_shop=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(?settings, "starting");

    ensure_database_exists(&settings.database_url).await?;
    let pool = connect(&settings).await?;
    apply_migrations(&pool).await?;

    if let Some(path) = &settings.seed_path {
        let fixture = CatalogFixture::load(path).await?;
        seed_catalog(&pool, &fixture).await?;
    }

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    let router = app(AppState::new(pool, settings));
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
