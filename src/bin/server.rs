//! Resource server: reads settings from the environment (and `.env`), prepares the store, serves CRUD routes.

use resource_api::{
    app,
    ensure_database_exists,
    ensure_resource_table,
    load_definition,
    AppState,
    CrudService,
    MemoryStore,
    PgStore,
    ResourceStore,
    Settings,
    StoreKind,
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
                .unwrap_or_else(|_| EnvFilter::new("resource_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let definition = Arc::new(load_definition(&settings.resource).await?);

    let store: Arc<dyn ResourceStore> = match settings.store {
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            ensure_resource_table(&pool, &definition).await?;
            Arc::new(PgStore::new(pool, definition.clone()))
        }
    };

    let state = AppState::new(CrudService::new(store, definition.clone()));
    let router = app(state, settings.body_limit_bytes);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(
        resource = %definition.path_segment,
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, router).await?;
    Ok(())
}
