//! Server: reads settings, prepares the store (PostgreSQL by default), serves the API.

use enrollment_api::{
    apply_migrations, build_app, ensure_database_exists, AppState, MemoryStore, PgStore, Settings, StoreKind,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("enrollment_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let state = match settings.store {
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            apply_migrations(&pool).await?;
            AppState::new(Arc::new(PgStore::new(pool)))
        }
        StoreKind::Memory => {
            tracing::warn!("APP_STORE=memory: data will not survive a restart");
            AppState::new(Arc::new(MemoryStore::new()))
        }
    };

    let app = build_app(state, settings.body_limit);
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
