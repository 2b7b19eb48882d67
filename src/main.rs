use std::sync::Arc;

use lounge::{
    clock::{Clock, SystemClock},
    config::Config,
    state::Chat,
    store::{MemoryStore, SqliteStore, Store},
    sweeper::Sweeper,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env()?;

    let store: Arc<dyn Store> = match &cfg.database_url {
        Some(url) => Arc::new(SqliteStore::connect(url, cfg.max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, keeping participants and messages in memory");
            Arc::new(MemoryStore::default())
        }
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    tokio::spawn(Sweeper::new(store.clone(), clock.clone(), cfg.cutoff).run(cfg.refresh));  // presence sweeper

    let app = lounge::app(Chat::new(store, clock), cfg.body_limit);

    let listener = tokio::net::TcpListener::bind(cfg.addr).await?;
    tracing::info!(addr = %cfg.addr, refresh = ?cfg.refresh, cutoff = ?cfg.cutoff, "listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
